use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable trigram extension for similarity-based search
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
                .await?;
        }

        // ============ VENUES TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_venues_city_state")
                    .table(Venues::Table)
                    .col(Venues::City)
                    .col(Venues::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_venues_created_at")
                    .table(Venues::Table)
                    .col(Venues::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Case-insensitive name search on venues
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE INDEX idx_venues_name_trgm ON venues USING GIN (lower(name) gin_trgm_ops)",
                )
                .await?;
        }

        // ============ ARTISTS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_artists_city_state")
                    .table(Artists::Table)
                    .col(Artists::City)
                    .col(Artists::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_artists_created_at")
                    .table(Artists::Table)
                    .col(Artists::CreatedAt)
                    .to_owned(),
            )
            .await?;

        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE INDEX idx_artists_name_trgm ON artists USING GIN (lower(name) gin_trgm_ops)",
                )
                .await?;
        }

        // ============ SHOWS TABLE INDEXES ============
        manager
            .create_index(
                Index::create()
                    .name("idx_shows_venue_id")
                    .table(Shows::Table)
                    .col(Shows::VenueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_artist_id")
                    .table(Shows::Table)
                    .col(Shows::ArtistId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shows_start_time")
                    .table(Shows::Table)
                    .col(Shows::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared("DROP INDEX IF EXISTS idx_venues_name_trgm")
                .await
                .ok();
            manager
                .get_connection()
                .execute_unprepared("DROP INDEX IF EXISTS idx_artists_name_trgm")
                .await
                .ok();
        }

        for (name, table) in [
            ("idx_venues_city_state", Venues::Table.into_iden()),
            ("idx_venues_created_at", Venues::Table.into_iden()),
            ("idx_artists_city_state", Artists::Table.into_iden()),
            ("idx_artists_created_at", Artists::Table.into_iden()),
            ("idx_shows_venue_id", Shows::Table.into_iden()),
            ("idx_shows_artist_id", Shows::Table.into_iden()),
            ("idx_shows_start_time", Shows::Table.into_iden()),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    City,
    State,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    City,
    State,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Shows {
    Table,
    VenueId,
    ArtistId,
    StartTime,
}
