use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::BookingError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("{0}")]
    Booking(#[from] BookingError),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn booking_status(err: &BookingError) -> StatusCode {
    match err {
        BookingError::InsufficientPoints { .. } => StatusCode::PAYMENT_REQUIRED,
        BookingError::BookingNotFound => StatusCode::NOT_FOUND,
        BookingError::InvalidGroupSize(_)
        | BookingError::InvalidLevel(_)
        | BookingError::InvalidCategory(_)
        | BookingError::InvalidStatus(_)
        | BookingError::InvalidProposal(_) => StatusCode::BAD_REQUEST,
        e if e.is_conflict() => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Booking(e) => booking_status(e),
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Db(_) | AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Db(e) => tracing::error!("Database error: {e}"),
            AppError::Anyhow(e) => tracing::error!("Unhandled error: {e:#}"),
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            _ => {}
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
