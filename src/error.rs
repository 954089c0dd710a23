use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;

use crate::models::ErrorBody;

/// Failures of the film service.
#[derive(Debug, thiserror::Error)]
pub enum FilmError {
    #[error("Film not found.")]
    NotFound,
    #[error(transparent)]
    Store(#[from] DbErr),
}

pub type FilmResult<T> = Result<T, FilmError>;

/// Failures of the HTTP layer. Every variant renders as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("Film not found.")]
    NotFound,
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Unavailable(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Store faults on read paths surface as 500.
    pub fn read_failure(err: FilmError, describe: impl FnOnce(&DbErr) -> String) -> Self {
        match err {
            FilmError::NotFound => Self::NotFound,
            FilmError::Store(db) => {
                let message = describe(&db);
                tracing::error!(error = %db, "{message}");
                Self::Internal(message)
            },
        }
    }

    /// Store faults on write paths surface as 503.
    pub fn write_failure(err: FilmError, describe: impl FnOnce(&DbErr) -> String) -> Self {
        match err {
            FilmError::NotFound => Self::NotFound,
            FilmError::Store(db) => {
                let message = describe(&db);
                tracing::error!(error = %db, "{message}");
                Self::Unavailable(message)
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(format!("params[id]: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("query: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Validation(_) = &self {
            tracing::debug!(error = %self, "rejected request");
        }
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
