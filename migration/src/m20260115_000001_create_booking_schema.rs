use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)] // Schema migration requires extensive table definitions
    #[allow(clippy::match_wildcard_for_single_variants)] // Wildcard matches for unsupported databases are semantically correct
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable UUID extension for PostgreSQL
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("CREATE EXTENSION IF NOT EXISTS \"uuid-ossp\";")
                .await?;
        }

        // Create venues table
        let mut venues_table = Table::create()
            .table(Venues::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Venues::Name)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Venues::City).string().not_null())
            .col(ColumnDef::new(Venues::State).string().not_null())
            .col(ColumnDef::new(Venues::Address).string())
            .col(ColumnDef::new(Venues::Phone).string().not_null())
            .col(ColumnDef::new(Venues::Genres).json().not_null())
            .col(ColumnDef::new(Venues::ImageLink).string())
            .col(ColumnDef::new(Venues::Website).string())
            .col(ColumnDef::new(Venues::FacebookLink).string())
            .col(
                ColumnDef::new(Venues::SeekingTalent)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Venues::SeekingDescription).text())
            .col(
                ColumnDef::new(Venues::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Venues::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();

        // Add ID column with appropriate type and default based on database backend
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                venues_table.col(
                    ColumnDef::new(Venues::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                venues_table.col(ColumnDef::new(Venues::Id).uuid().not_null().primary_key());
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(venues_table).await?;

        // Create artists table
        let mut artists_table = Table::create()
            .table(Artists::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Artists::Name)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(Artists::City).string().not_null())
            .col(ColumnDef::new(Artists::State).string().not_null())
            .col(ColumnDef::new(Artists::Phone).string().not_null())
            .col(ColumnDef::new(Artists::Genres).json().not_null())
            .col(ColumnDef::new(Artists::ImageLink).string())
            .col(ColumnDef::new(Artists::Website).string())
            .col(ColumnDef::new(Artists::FacebookLink).string())
            .col(
                ColumnDef::new(Artists::SeekingVenue)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Artists::SeekingDescription).text())
            .col(
                ColumnDef::new(Artists::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Artists::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .to_owned();

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                artists_table.col(
                    ColumnDef::new(Artists::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                artists_table.col(ColumnDef::new(Artists::Id).uuid().not_null().primary_key());
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(artists_table).await?;

        // Create shows table. A show is a join record between a venue and an
        // artist; removing either side removes the show.
        let mut shows_table = Table::create()
            .table(Shows::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Shows::StartTime)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(Shows::VenueId).uuid().not_null())
            .col(ColumnDef::new(Shows::ArtistId).uuid().not_null())
            .col(
                ColumnDef::new(Shows::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .col(
                ColumnDef::new(Shows::LastUpdated)
                    .timestamp_with_time_zone()
                    .not_null()
                    .default(Expr::current_timestamp()),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("shows_venue_id_fkey")
                    .from(Shows::Table, Shows::VenueId)
                    .to(Venues::Table, Venues::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("shows_artist_id_fkey")
                    .from(Shows::Table, Shows::ArtistId)
                    .to(Artists::Table, Artists::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .on_update(ForeignKeyAction::NoAction),
            )
            .to_owned();

        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                shows_table.col(
                    ColumnDef::new(Shows::Id)
                        .uuid()
                        .not_null()
                        .primary_key()
                        .default(Expr::cust("uuid_generate_v4()")),
                );
            }
            sea_orm::DatabaseBackend::Sqlite => {
                shows_table.col(ColumnDef::new(Shows::Id).uuid().not_null().primary_key());
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".to_string()));
            }
        }

        manager.create_table(shows_table).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order
        manager
            .drop_table(Table::drop().table(Shows::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Artists::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Venues::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

// All table identifiers
#[derive(DeriveIden)]
enum Venues {
    Table,
    Id,
    Name,
    City,
    State,
    Address,
    Phone,
    Genres,
    ImageLink,
    Website,
    FacebookLink,
    SeekingTalent,
    SeekingDescription,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    Id,
    Name,
    City,
    State,
    Phone,
    Genres,
    ImageLink,
    Website,
    FacebookLink,
    SeekingVenue,
    SeekingDescription,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Shows {
    Table,
    Id,
    StartTime,
    VenueId,
    ArtistId,
    CreatedAt,
    LastUpdated,
}
