use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::error;

use crate::allocation::PlayerId;
use crate::api::models::ErrorResponse;
use crate::config::settings::AppConfig;
use crate::database::{self, DbConn, DbPool};
use crate::errors::ServiceError;

pub mod admin;
pub mod games;
pub mod players;

pub const PLAYER_ID_HEADER: &str = "X-Player-Id";

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
}

impl AppState {
    pub fn connection(&self) -> Result<DbConn, ApiError> {
        database::get_connection(&self.pool).map_err(|e| ApiError::Service(e.into()))
    }
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(&'static str),
    Service(ServiceError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            ApiError::Service(err) => {
                let status = match &err {
                    ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                    ServiceError::Rejected(_) | ServiceError::Allocation(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    ServiceError::Database(_) | ServiceError::Internal(_) => {
                        error!("Request failed: {:?}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub fn is_admin(headers: &HeaderMap, config: &AppConfig) -> bool {
    let expected = format!("Bearer {}", config.server.admin_token);
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|value| value == expected)
}

pub fn require_admin(headers: &HeaderMap, config: &AppConfig) -> Result<(), ApiError> {
    if is_admin(headers, config) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("admin token required"))
    }
}

/// The calling player, as asserted by the upstream auth layer.
pub fn player_identity(headers: &HeaderMap) -> Result<PlayerId, ApiError> {
    headers
        .get(PLAYER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .ok_or(ApiError::Unauthorized("missing player identity"))
}
