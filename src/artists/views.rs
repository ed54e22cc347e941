use super::models::{Artist, Column, Entity, router as crudrouter};
use crate::common::auth::Role;
use crate::common::errors::{ApiError, DbErrorExt};
use crate::common::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum_keycloak_auth::{PassthroughMode, layer::KeycloakAuthLayer};
use chrono::Utc;
use crudcrate::CRUDResource;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use serde_json::{Value, json};
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    let mut mutating_router = crudrouter(&state.db.clone());

    mutating_router =
        mutating_router.route("/search", get(search_artists).with_state(state.clone()));

    if let Some(instance) = state.keycloak_auth_instance.clone() {
        mutating_router = mutating_router.layer(
            KeycloakAuthLayer::<Role>::builder()
                .instance(instance)
                .passthrough_mode(PassthroughMode::Block)
                .persist_raw_claims(false)
                .expected_audiences(vec![String::from("account")])
                .required_roles(vec![Role::Administrator])
                .build(),
        );
    } else if !state.config.tests_running {
        tracing::warn!(
            "Mutating routes of {} router are not protected",
            Artist::RESOURCE_NAME_PLURAL
        );
    }

    mutating_router
}

#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring to match against names, case-insensitively
    pub q: String,
}

/// Search artists by name
#[utoipa::path(
    get,
    path = "/artists/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Artists whose name contains the search term"),
        (status = 500, description = "Internal server error")
    ),
    tag = "artists",
    summary = "Search artists",
    description = "Case-insensitive substring search on artist names"
)]
pub async fn search_artists(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let db = &state.db;
    let pattern = format!("%{}%", params.q.to_lowercase());

    let artists = Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).like(&pattern))
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| e.to_api_error("artist"))?;

    let now = Utc::now();
    let mut data = Vec::new();

    for artist in artists {
        let num_upcoming_shows = crate::shows::models::Entity::find()
            .filter(crate::shows::models::Column::ArtistId.eq(artist.id))
            .filter(crate::shows::models::Column::StartTime.gt(now))
            .count(db)
            .await
            .map_err(|e| e.to_api_error("artist"))?;

        data.push(json!({
            "id": artist.id,
            "name": artist.name,
            "num_upcoming_shows": num_upcoming_shows,
        }));
    }

    Ok(Json(json!({
        "count": data.len(),
        "data": data,
    })))
}
