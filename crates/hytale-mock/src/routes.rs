//! HTTP routes.
//!
//! Every handler is a thin translation: pull the username out of the body,
//! call one [`SessionRegistry`] operation, wrap the result in its response
//! struct. All the rules live in the registry.
//!
//! ```text
//! GET  /                    → IndexResponse
//! GET  /api/health          → HealthResponse
//! GET  /api/server/info     → ServerInfo
//! POST /api/server/auth     → AuthResponse            | 400
//! POST /api/players/join    → 201 JoinResponse        | 400 | 409 | 503
//! POST /api/players/leave   → LeaveResponse           | 400 | 404
//! GET  /api/players         → PlayerListResponse
//! GET  /ws                  → push channel (see `push`)
//! *                         → static file | 404 {error, path}
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use chrono::Utc;
use hytale_mock_protocol::{
    AuthResponse, HealthResponse, IndexResponse, JoinResponse, LeaveResponse,
    PlayerListResponse, ServerInfo, UsernameRequest,
};
use hytale_mock_session::SessionRegistry;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{Environment, ServerConfig};
use crate::error::ApiError;
use crate::push;
use crate::server::ServerState;

type AppState = Arc<ServerState>;

const INDEX_NAME: &str = "Hytale Server Mock";
const INDEX_MESSAGE: &str = "Servidor mockado em execução";
const MSG_AUTHENTICATED: &str = "Autenticado no servidor Hytale!";
const MSG_JOINED: &str = "Jogador conectado com sucesso";
const MSG_LEFT: &str = "Jogador desconectado";

/// Builds the full application router around an existing registry.
///
/// The push channel of a router built this way is never told to shut
/// down; [`GameServer`](crate::GameServer) wires its own token instead.
/// Useful for driving the API in-process from tests.
pub fn router(config: &ServerConfig, registry: Arc<SessionRegistry>) -> Router {
    let state = Arc::new(ServerState {
        registry,
        environment: config.environment,
        shutdown: CancellationToken::new(),
    });
    app(state, config.static_dir.as_deref())
}

pub(crate) fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let environment = state.environment;

    let router = Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/server/info", get(server_info))
        .route("/api/server/auth", post(authenticate))
        .route("/api/players/join", post(join))
        .route("/api/players/leave", post(leave))
        .route("/api/players", get(list_players))
        .route("/ws", get(push::ws_handler))
        .method_not_allowed_fallback(not_found);

    let router = match static_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "serving static files");
            router.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .fallback(not_found.into_service()),
            )
        }
        None => router.fallback(not_found),
    };

    with_layers(router, environment).with_state(state)
}

/// Panic recovery, CORS and request tracing, outermost last.
fn with_layers(router: Router<AppState>, environment: Environment) -> Router<AppState> {
    router
        .layer(CatchPanicLayer::custom(move |panic| {
            panic_response(panic, environment)
        }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// =============================================================================
// Metadata
// =============================================================================

async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let endpoints = [
        ("health", "GET /api/health"),
        ("serverInfo", "GET /api/server/info"),
        ("auth", "POST /api/server/auth"),
        ("join", "POST /api/players/join"),
        ("leave", "POST /api/players/leave"),
        ("players", "GET /api/players"),
        ("push", "GET /ws"),
    ]
    .into_iter()
    .map(|(label, route)| (label.to_string(), route.to_string()))
    .collect::<BTreeMap<_, _>>();

    let info = state.registry.info().await;
    Json(IndexResponse {
        name: INDEX_NAME.to_string(),
        status: info.status.to_string(),
        version: info.version,
        message: INDEX_MESSAGE.to_string(),
        endpoints,
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        uptime: state.registry.uptime().await,
    })
}

async fn server_info(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(state.registry.info().await)
}

// =============================================================================
// Sessions
// =============================================================================

/// Unwraps the JSON body. A body axum cannot parse (missing, wrong content
/// type, not JSON) is reported the same way as a missing username.
fn username_body(
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<UsernameRequest, ApiError> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "rejected request body");
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let request = username_body(body)?;
    let grant = state.registry.authenticate(request.username())?;
    Ok(Json(AuthResponse {
        success: true,
        token: grant.token,
        username: grant.username,
        message: MSG_AUTHENTICATED.to_string(),
    }))
}

async fn join(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let request = username_body(body)?;
    let outcome = state.registry.join(request.username()).await?;
    Ok((
        StatusCode::CREATED,
        Json(JoinResponse {
            success: true,
            message: MSG_JOINED.to_string(),
            player: outcome.player,
            players_online: outcome.players_online,
        }),
    ))
}

async fn leave(
    State(state): State<AppState>,
    body: Result<Json<UsernameRequest>, JsonRejection>,
) -> Result<Json<LeaveResponse>, ApiError> {
    let request = username_body(body)?;
    let players_online = state.registry.leave(request.username()).await?;
    Ok(Json(LeaveResponse {
        success: true,
        message: MSG_LEFT.to_string(),
        players_online,
    }))
}

async fn list_players(State(state): State<AppState>) -> Json<PlayerListResponse> {
    let players = state.registry.list_players().await;
    Json(PlayerListResponse {
        count: players.len(),
        max_players: state.registry.max_players(),
        players,
    })
}

// =============================================================================
// Fallbacks
// =============================================================================

async fn not_found(uri: Uri) -> ApiError {
    tracing::debug!(path = %uri.path(), "no route");
    ApiError::RouteNotFound {
        path: uri.path().to_string(),
    }
}

/// Turns a caught handler panic into the 500 body.
fn panic_response(panic: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(%detail, "request handler panicked");
    ApiError::internal(detail, environment).into_response()
}
