use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use candleview_core::{CoreError, ValidationError, WarehouseError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Process-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to open candle store: {0}")]
    Store(#[from] WarehouseError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Validation(_) => 2,
            Self::Store(_) => 3,
            Self::Bind { .. } => 4,
            Self::Logging(_) => 5,
            Self::Io(_) => 10,
        }
    }
}

/// Handler failure rendered as `500 {"error": message}`.
#[derive(Debug)]
pub struct ApiError(CoreError);

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl From<CoreError> for ApiError {
    fn from(value: CoreError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        error!(error = %message, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: message }),
        )
            .into_response()
    }
}
