use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use database::DbError;
use forecaster::ForecastError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("Forecast error: {0}")]
    Forecast(#[from] ForecastError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Invalid input: {0}")]
    Input(#[from] core_types::CoreError),
}

impl AppError {
    pub fn invalid_token() -> Self {
        AppError::Unauthenticated("Token inválido".to_string())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthenticated(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Input(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Database(DbError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "El usuario ya existe".to_string())
            }
            AppError::Database(DbError::PlaceNotPermitted(_)) => (
                StatusCode::FORBIDDEN,
                "No autorizado para acceder a este lugar".to_string(),
            ),
            AppError::Database(DbError::MissingPermission(permission)) => (
                StatusCode::FORBIDDEN,
                format!("No autorizado: se requiere el permiso {permission}"),
            ),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, db_err.to_string())
            }
            AppError::Forecast(ForecastError::NotEnoughData(message)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("No hay datos suficientes para predecir: {message}"),
            ),
            AppError::Forecast(ForecastError::InvalidParameter(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Forecast(forecast_err) => {
                tracing::error!(error = ?forecast_err, "Forecast error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while forecasting".to_string(),
                )
            }
            AppError::Session(session_err) => {
                tracing::error!(error = ?session_err, "Session store error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A session store error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
