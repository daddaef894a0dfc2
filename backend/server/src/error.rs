use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{config::ConfigError, store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown cache region: {0}")]
    UnknownRegion(String),

    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upstream client error: {0}")]
    Upstream(#[from] feeds::FetchError),

    #[error("Internal error: {0}")]
    InternalError(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownRegion { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
