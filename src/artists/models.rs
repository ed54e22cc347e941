use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{QueryOrder, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "artists")]
#[crudcrate(
    generate_router,
    api_struct = "Artist",
    name_singular = "artist",
    name_plural = "artists",
    description = "Artists are performers that can be booked for shows. An artist owns its shows: deleting an artist removes every show they are booked for.",
    fn_get_one = get_one_artist,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[sea_orm(unique)]
    #[crudcrate(sortable, filterable, fulltext)]
    pub name: String,
    #[crudcrate(sortable, filterable, fulltext)]
    pub city: String,
    #[crudcrate(sortable, filterable)]
    pub state: String,
    #[crudcrate(filterable)]
    pub phone: String,
    /// JSON array of genre names
    pub genres: serde_json::Value,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub seeking_venue: bool,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(fulltext, list_model = false)]
    pub seeking_description: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], create_model = false, update_model = false, list_model = false)]
    pub past_shows: Vec<ArtistShowEntry>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], create_model = false, update_model = false, list_model = false)]
    pub upcoming_shows: Vec<ArtistShowEntry>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = 0, create_model = false, update_model = false, list_model = false)]
    pub past_shows_count: usize,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = 0, create_model = false, update_model = false, list_model = false)]
    pub upcoming_shows_count: usize,
}

/// One booked show as it appears on an artist page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArtistShowEntry {
    pub venue_id: Uuid,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::shows::models::Entity")]
    Shows,
}

impl Related<crate::shows::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Custom `get_one` that loads the artist's shows joined with their venues and
/// splits them into past and upcoming against the current time
async fn get_one_artist(db: &DatabaseConnection, id: Uuid) -> Result<Artist, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Artist with id '{id}' not found")))?;

    let shows = crate::shows::models::Entity::find()
        .filter(crate::shows::models::Column::ArtistId.eq(id))
        .find_also_related(crate::venues::models::Entity)
        .order_by_asc(crate::shows::models::Column::StartTime)
        .all(db)
        .await?;

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for (show, venue) in shows {
        // The FK guarantees the venue row exists
        let Some(venue) = venue else { continue };
        let entry = ArtistShowEntry {
            venue_id: venue.id,
            venue_name: venue.name,
            venue_image_link: venue.image_link,
            start_time: show.start_time,
        };
        if show.start_time < now {
            past_shows.push(entry);
        } else {
            upcoming_shows.push(entry);
        }
    }

    let mut artist: Artist = model.into();
    artist.past_shows_count = past_shows.len();
    artist.upcoming_shows_count = upcoming_shows.len();
    artist.past_shows = past_shows;
    artist.upcoming_shows = upcoming_shows;

    Ok(artist)
}
