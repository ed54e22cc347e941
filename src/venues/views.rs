use super::models::{Column, Entity, Venue, router as crudrouter};
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
use std::collections::BTreeMap;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;

pub fn router(state: &AppState) -> OpenApiRouter {
    let mut mutating_router = crudrouter(&state.db.clone());

    // Custom routes for the venue listing and search pages
    mutating_router = mutating_router
        .route("/grouped", get(get_grouped_venues).with_state(state.clone()))
        .route("/search", get(search_venues).with_state(state.clone()));

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
            Venue::RESOURCE_NAME_PLURAL
        );
    }

    mutating_router
}

#[derive(Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring to match against names, case-insensitively
    pub q: String,
}

/// Get venues grouped by city and state
#[utoipa::path(
    get,
    path = "/venues/grouped",
    responses(
        (status = 200, description = "Venues grouped by (city, state), each with its upcoming show count"),
        (status = 500, description = "Internal server error")
    ),
    tag = "venues",
    summary = "Group venues by area",
    description = "Retrieve all venues grouped by their city and state, with the number of upcoming shows per venue"
)]
pub async fn get_grouped_venues(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let db = &state.db;

    let venues = Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| e.to_api_error("venue"))?;

    let now = Utc::now();
    let mut areas: BTreeMap<(String, String), Vec<Value>> = BTreeMap::new();

    for venue in venues {
        let num_upcoming_shows = crate::shows::models::Entity::find()
            .filter(crate::shows::models::Column::VenueId.eq(venue.id))
            .filter(crate::shows::models::Column::StartTime.gt(now))
            .count(db)
            .await
            .map_err(|e| e.to_api_error("venue"))?;

        areas
            .entry((venue.city.clone(), venue.state.clone()))
            .or_default()
            .push(json!({
                "id": venue.id,
                "name": venue.name,
                "num_upcoming_shows": num_upcoming_shows,
            }));
    }

    let data: Vec<Value> = areas
        .into_iter()
        .map(|((city, state), venues)| {
            json!({
                "city": city,
                "state": state,
                "venues": venues,
            })
        })
        .collect();

    Ok(Json(json!(data)))
}

/// Search venues by name
#[utoipa::path(
    get,
    path = "/venues/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Venues whose name contains the search term"),
        (status = 500, description = "Internal server error")
    ),
    tag = "venues",
    summary = "Search venues",
    description = "Case-insensitive substring search on venue names"
)]
pub async fn search_venues(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let db = &state.db;
    let pattern = format!("%{}%", params.q.to_lowercase());

    // LOWER(name) LIKE keeps the match case-insensitive on both backends
    let venues = Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Name))).like(&pattern))
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| e.to_api_error("venue"))?;

    let now = Utc::now();
    let mut data = Vec::new();

    for venue in venues {
        let num_upcoming_shows = crate::shows::models::Entity::find()
            .filter(crate::shows::models::Column::VenueId.eq(venue.id))
            .filter(crate::shows::models::Column::StartTime.gt(now))
            .count(db)
            .await
            .map_err(|e| e.to_api_error("venue"))?;

        data.push(json!({
            "id": venue.id,
            "name": venue.name,
            "num_upcoming_shows": num_upcoming_shows,
        }));
    }

    Ok(Json(json!({
        "count": data.len(),
        "data": data,
    })))
}
