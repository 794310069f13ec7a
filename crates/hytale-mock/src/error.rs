//! Error types for the server crate.
//!
//! Two layers:
//!
//! - [`ApiError`] is what an HTTP handler returns. It knows how to turn
//!   itself into a status code and a JSON [`ErrorBody`].
//! - [`ServerError`] is what the process-level API (`build`, `run`)
//!   returns. Registry and protocol failures never reach it: they end as
//!   an HTTP status or a dropped push subscriber.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hytale_mock_protocol::ErrorBody;
use hytale_mock_session::RegistryError;

use crate::config::Environment;

// ---------------------------------------------------------------------------
// Stable client-facing messages
// ---------------------------------------------------------------------------

pub(crate) const MSG_INVALID_USERNAME: &str = "Username inválido ou não fornecido";
pub(crate) const MSG_ALREADY_CONNECTED: &str = "Jogador já conectado";
pub(crate) const MSG_SERVER_FULL: &str = "Servidor cheio";
pub(crate) const MSG_PLAYER_NOT_FOUND: &str = "Jogador não encontrado";
pub(crate) const MSG_ROUTE_NOT_FOUND: &str = "Rota não encontrada";
pub(crate) const MSG_INTERNAL: &str = "Erro interno do servidor";

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Failure of a single HTTP request.
///
/// | Variant | Status |
/// |---|---|
/// | `Registry(InvalidInput)`, `BadRequest` | 400 |
/// | `Registry(AlreadyPresent)` | 409 |
/// | `Registry(Capacity)` | 503 |
/// | `Registry(NotFound)`, `RouteNotFound` | 404 |
/// | `Internal` | 500 |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A registry operation was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The request body was missing or not valid JSON.
    #[error("malformed request body: {0}")]
    BadRequest(String),

    /// No route matches the method and path.
    #[error("no route for {path}")]
    RouteNotFound { path: String },

    /// Something broke inside the server. `detail` is only shown to
    /// clients in development mode.
    #[error("internal error")]
    Internal { detail: Option<String> },
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Registry(RegistryError::InvalidInput) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Registry(RegistryError::AlreadyPresent(_)) => StatusCode::CONFLICT,
            Self::Registry(RegistryError::Capacity { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Registry(RegistryError::NotFound(_)) | Self::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for this error.
    ///
    /// Registry and body errors collapse to their stable message: the
    /// client never sees usernames echoed back or parser diagnostics.
    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Registry(RegistryError::InvalidInput) | Self::BadRequest(_) => {
                ErrorBody::new(MSG_INVALID_USERNAME)
            }
            Self::Registry(RegistryError::AlreadyPresent(_)) => ErrorBody::new(MSG_ALREADY_CONNECTED),
            Self::Registry(RegistryError::Capacity { .. }) => ErrorBody::new(MSG_SERVER_FULL),
            Self::Registry(RegistryError::NotFound(_)) => ErrorBody::new(MSG_PLAYER_NOT_FOUND),
            Self::RouteNotFound { path } => ErrorBody {
                path: Some(path.clone()),
                ..ErrorBody::new(MSG_ROUTE_NOT_FOUND)
            },
            Self::Internal { detail } => ErrorBody {
                message: detail.clone(),
                ..ErrorBody::new(MSG_INTERNAL)
            },
        }
    }

    /// An internal error carrying `detail` only when running in development.
    pub fn internal(detail: impl Into<String>, environment: Environment) -> Self {
        Self::Internal {
            detail: environment.is_development().then(|| detail.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

// ---------------------------------------------------------------------------
// ServerError
// ---------------------------------------------------------------------------

/// Top-level error for building and running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server loop failed.
    #[error("server loop failed: {0}")]
    Serve(#[source] std::io::Error),

    /// OS signal handlers could not be installed.
    #[error("failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),

    /// Connections were still open when the grace period ran out.
    #[error("shutdown did not finish within {0:?}")]
    ShutdownTimedOut(Duration),
}
