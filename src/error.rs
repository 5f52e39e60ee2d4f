use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::{DuplicateField, StoreError};

/// Every failure a request can end with. Mapped to HTTP only in `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("duplicate: {0}")]
    Duplicate(DuplicateField),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("inactive account")]
    InactiveAccount,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Duplicate(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::InactiveAccount
            | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal and upstream details stay in the logs.
    pub fn detail(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Duplicate(field) => field.to_string(),
            AppError::InvalidCredentials => "Incorrect email or password".into(),
            AppError::InactiveAccount => "Inactive user".into(),
            AppError::Unauthenticated => "Could not validate credentials".into(),
            AppError::NotFound(what) => format!("{what} not found"),
            AppError::Upstream(_) => "Upstream service unavailable".into(),
            AppError::Internal(_) => "Internal server error".into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => AppError::Duplicate(field),
            StoreError::Database(e) => AppError::Internal(anyhow::Error::new(e).context("database")),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => error!(error = ?e, "internal error"),
            AppError::Upstream(msg) => error!(error = %msg, "upstream error"),
            _ => {}
        }

        let mut res = (status, Json(json!({ "detail": self.detail() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        res
    }
}
