use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(&'static str),

    #[error("Todo not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound,

    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Store { message, source } = &self {
            error!(error = %source, "{message}");
        }

        let status = self.status();

        (status, Json(Envelope::<()>::message(self.to_string()))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("invalid allowed origin '{0}'")]
    Origin(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MalformedPayload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Validation("Content is required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::RouteNotFound.status(), StatusCode::NOT_FOUND);

        let corrupt = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = AppError::store("Error fetching todos")(StoreError::Corrupt(corrupt));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_message_hides_source() {
        let corrupt = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = AppError::store("Error updating todo")(StoreError::Corrupt(corrupt));

        assert_eq!(err.to_string(), "Error updating todo");
    }
}
