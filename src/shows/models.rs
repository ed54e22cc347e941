use chrono::{DateTime, Utc};
use crudcrate::{CRUDResource, EntityToModels};
use sea_orm::{ActiveModelTrait, QueryOrder, QuerySelect, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, EntityToModels)]
#[sea_orm(table_name = "shows")]
#[crudcrate(
    generate_router,
    api_struct = "Show",
    name_singular = "show",
    name_plural = "shows",
    description = "A show books one artist at one venue at a start time. Whether a show is upcoming or past is derived from its start time at query time, never stored.",
    fn_get_one = get_one_show,
    fn_get_all = get_all_shows,
    fn_create = create_show,
)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[crudcrate(primary_key, update_model = false, create_model = false, on_create = Uuid::new_v4())]
    pub id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub start_time: DateTime<Utc>,
    #[crudcrate(sortable, filterable)]
    pub venue_id: Uuid,
    #[crudcrate(sortable, filterable)]
    pub artist_id: Uuid,
    #[crudcrate(update_model = false, create_model = false, on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub created_at: DateTime<Utc>,
    #[crudcrate(update_model = false, create_model = false, on_update = chrono::Utc::now(), on_create = chrono::Utc::now(), sortable, list_model = false)]
    pub last_updated: DateTime<Utc>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub venue_name: Option<String>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub venue_image_link: Option<String>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub artist_name: Option<String>,
    #[sea_orm(ignore)]
    #[crudcrate(non_db_attr = true, default = None, create_model = false, update_model = false)]
    pub artist_image_link: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::venues::models::Entity",
        from = "Column::VenueId",
        to = "crate::venues::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Venues,
    #[sea_orm(
        belongs_to = "crate::artists::models::Entity",
        from = "Column::ArtistId",
        to = "crate::artists::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Artists,
}

impl Related<crate::venues::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venues.def()
    }
}

impl Related<crate::artists::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attach the venue and artist display fields to a show row
async fn enrich_show(db: &DatabaseConnection, model: Model) -> Result<Show, DbErr> {
    let venue = crate::venues::models::Entity::find_by_id(model.venue_id)
        .one(db)
        .await?;
    let artist = crate::artists::models::Entity::find_by_id(model.artist_id)
        .one(db)
        .await?;

    let mut show: Show = model.into();
    if let Some(venue) = venue {
        show.venue_name = Some(venue.name);
        show.venue_image_link = venue.image_link;
    }
    if let Some(artist) = artist {
        show.artist_name = Some(artist.name);
        show.artist_image_link = artist.image_link;
    }

    Ok(show)
}

async fn get_one_show(db: &DatabaseConnection, id: Uuid) -> Result<Show, DbErr> {
    let model = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Show with id '{id}' not found")))?;

    enrich_show(db, model).await
}

/// Custom `get_all` that keeps the listing in chronological order and attaches
/// the venue and artist display fields to every row
async fn get_all_shows(
    db: &DatabaseConnection,
    condition: &sea_orm::Condition,
    _order_column: Column,
    _order_direction: sea_orm::Order,
    offset: u64,
    limit: u64,
) -> Result<Vec<ShowList>, DbErr> {
    let models = Entity::find()
        .filter(condition.clone())
        .order_by_asc(Column::StartTime)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    let mut shows: Vec<ShowList> = Vec::new();

    for model in models {
        let venue = crate::venues::models::Entity::find_by_id(model.venue_id)
            .one(db)
            .await?;
        let artist = crate::artists::models::Entity::find_by_id(model.artist_id)
            .one(db)
            .await?;

        let mut show_list = ShowList::from(model);
        if let Some(venue) = venue {
            show_list.venue_name = Some(venue.name);
            show_list.venue_image_link = venue.image_link;
        }
        if let Some(artist) = artist {
            show_list.artist_name = Some(artist.name);
            show_list.artist_image_link = artist.image_link;
        }
        shows.push(show_list);
    }

    Ok(shows)
}

/// Custom `create` that rejects bookings against a missing venue or artist so
/// the caller gets a not-found error instead of a bare constraint violation
async fn create_show(db: &DatabaseConnection, create_data: ShowCreate) -> Result<Show, DbErr> {
    if crate::venues::models::Entity::find_by_id(create_data.venue_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(DbErr::RecordNotFound(format!(
            "Venue with id '{}' not found",
            create_data.venue_id
        )));
    }

    if crate::artists::models::Entity::find_by_id(create_data.artist_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(DbErr::RecordNotFound(format!(
            "Artist with id '{}' not found",
            create_data.artist_id
        )));
    }

    let active_model: ActiveModel = create_data.into();
    let inserted = active_model.insert(db).await?;

    Show::get_one(db, inserted.id).await
}
