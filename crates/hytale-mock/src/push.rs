//! WebSocket push channel at `GET /ws`.
//!
//! Each subscriber gets its own task running this handler. The flow is:
//!   1. Send one `server:info` event with the current metadata snapshot
//!   2. Idle, discarding anything the client sends, until the client goes
//!      away or the server shuts down
//!   3. On shutdown, send Close(1001 "going away") and drop the socket

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::response::Response;
use hytale_mock_protocol::{ProtocolError, PushEvent};

use crate::server::ServerState;

/// Per-process counter used to tell subscribers apart in logs.
static NEXT_SUBSCRIBER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, thiserror::Error)]
enum PushError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("websocket error: {0}")]
    Socket(#[from] axum::Error),
}

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<ServerState>) {
    let subscriber_id = NEXT_SUBSCRIBER_ID.fetch_add(1, Ordering::Relaxed);
    tracing::info!(subscriber_id, "push subscriber connected");

    if let Err(e) = serve_subscriber(&mut socket, &state).await {
        tracing::debug!(subscriber_id, error = %e, "push channel ended with error");
    }

    tracing::info!(subscriber_id, "push subscriber disconnected");
}

async fn serve_subscriber(socket: &mut WebSocket, state: &ServerState) -> Result<(), PushError> {
    let hello = PushEvent::ServerInfo(state.registry.info().await).to_json()?;
    socket.send(Message::Text(hello.into())).await?;

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => {
                let frame = CloseFrame {
                    code: close_code::AWAY,
                    reason: "server shutting down".into(),
                };
                socket.send(Message::Close(Some(frame))).await?;
                return Ok(());
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            },
        }
    }
}
