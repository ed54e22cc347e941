use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use std::fmt;

/// Error type for request handlers outside the generated CRUD routes
#[derive(Debug, Clone)]
pub enum ApiError {
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// Duplicate resource (409 Conflict)
    Duplicate { resource: String, field: String },
    /// Invalid user input (422 Unprocessable Entity)
    Validation { field: String, message: String },
    /// Anything else (500 Internal Server Error)
    Internal { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            ApiError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            ApiError::Validation { field, message } => {
                write!(f, "Validation error in field '{field}': {message}")
            }
            ApiError::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND"),
            ApiError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_RESOURCE"),
            ApiError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            ApiError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Extension trait mapping database errors onto HTTP semantics
pub trait DbErrorExt {
    fn to_api_error(self, resource: &str) -> ApiError;
}

impl DbErrorExt for DbErr {
    fn to_api_error(self, resource: &str) -> ApiError {
        match self {
            DbErr::RecordNotFound(msg) => ApiError::NotFound {
                resource: resource.to_string(),
                id: extract_id_from_message(&msg),
            },
            DbErr::Exec(err) | DbErr::Query(err) => {
                let msg = err.to_string();
                // Unique constraint wording differs between Postgres and SQLite
                if msg.contains("duplicate key") || msg.contains("UNIQUE constraint") {
                    ApiError::Duplicate {
                        resource: resource.to_string(),
                        field: "name".to_string(),
                    }
                } else {
                    ApiError::Internal { message: msg }
                }
            }
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Pull an id out of messages like "Venue with id 'abc-123' not found"
fn extract_id_from_message(msg: &str) -> String {
    msg.split_whitespace()
        .find_map(|word| {
            let cleaned = word.trim_matches('\'').trim_matches('"');
            if cleaned.len() == 36 && cleaned.matches('-').count() == 4 {
                Some(cleaned.to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
