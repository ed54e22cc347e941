use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{QueryOrder, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "venues")]
#[crudcrate(
    generate_router,
    api_struct = "Venue",
    name_singular = "venue",
    name_plural = "venues",
    description = "Venues are places that host shows. A venue owns its shows: deleting a venue removes every show booked there.",
    fn_get_one = get_one_venue,
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
    #[crudcrate(filterable, fulltext)]
    pub address: Option<String>,
    #[crudcrate(filterable)]
    pub phone: String,
    /// JSON array of genre names
    pub genres: serde_json::Value,
    pub image_link: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    #[crudcrate(sortable, filterable)]
    pub seeking_talent: bool,
    #[sea_orm(column_type = "Text", nullable)]
    #[crudcrate(fulltext, list_model = false)]
    pub seeking_description: Option<String>,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], create_model = false, update_model = false, list_model = false)]
    pub past_shows: Vec<VenueShowEntry>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = vec![], create_model = false, update_model = false, list_model = false)]
    pub upcoming_shows: Vec<VenueShowEntry>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = 0, create_model = false, update_model = false, list_model = false)]
    pub past_shows_count: usize,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = 0, create_model = false, update_model = false, list_model = false)]
    pub upcoming_shows_count: usize,
}

/// One booked show as it appears on a venue page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VenueShowEntry {
    pub artist_id: Uuid,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
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

/// Custom `get_one` that loads the venue's shows joined with their artists and
/// splits them into past and upcoming against the current time
async fn get_one_venue(db: &DatabaseConnection, id: Uuid) -> Result<Venue, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Venue with id '{id}' not found")))?;

    let shows = crate::shows::models::Entity::find()
        .filter(crate::shows::models::Column::VenueId.eq(id))
        .find_also_related(crate::artists::models::Entity)
        .order_by_asc(crate::shows::models::Column::StartTime)
        .all(db)
        .await?;

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for (show, artist) in shows {
        // The FK guarantees the artist row exists
        let Some(artist) = artist else { continue };
        let entry = VenueShowEntry {
            artist_id: artist.id,
            artist_name: artist.name,
            artist_image_link: artist.image_link,
            start_time: show.start_time,
        };
        if show.start_time < now {
            past_shows.push(entry);
        } else {
            upcoming_shows.push(entry);
        }
    }

    let mut venue: Venue = model.into();
    venue.past_shows_count = past_shows.len();
    venue.upcoming_shows_count = upcoming_shows.len();
    venue.past_shows = past_shows;
    venue.upcoming_shows = upcoming_shows;

    Ok(venue)
}
