//! `WebSocket` handler for real-time `data_update` streaming.
//!
//! Clients connect to `GET /ws/updates` and receive every
//! [`DataUpdate`] the broadcast loop publishes as a JSON text frame of
//! the form `{"event": "data_update", "data": {...}}`. No request is
//! needed to start receiving; anything the dashboard sends other than
//! ping or close is ignored.
//!
//! Frames arrive already encoded (see [`UpdateFrame`]), so a socket only
//! clones a shared buffer per update. A client that falls behind skips
//! the frames it missed and resumes from the newest one.
//!
//! [`DataUpdate`]: pulse_types::DataUpdate

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use crate::state::{AppState, UpdateFrame};

/// Upgrade an HTTP request to a `WebSocket` and begin streaming updates.
///
/// # Route
///
/// `GET /ws/updates`
pub async fn ws_updates(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| stream_updates(socket, state))
}

async fn stream_updates(mut socket: WebSocket, state: Arc<AppState>) {
    let mut frames = state.subscribe();
    debug!(subscribers = state.subscriber_count(), "Dashboard connected");

    loop {
        let step = tokio::select! {
            frame = frames.recv() => push_frame(&mut socket, frame).await,
            incoming = socket.recv() => answer_client(&mut socket, incoming).await,
        };
        if step.is_break() {
            break;
        }
    }

    debug!("Dashboard disconnected");
}

/// Send one broadcast frame to the dashboard.
async fn push_frame(
    socket: &mut WebSocket,
    frame: Result<Arc<UpdateFrame>, RecvError>,
) -> ControlFlow<()> {
    match frame {
        Ok(frame) => {
            if socket.send(Message::Text(frame.text.clone())).await.is_err() {
                return ControlFlow::Break(());
            }
        }
        Err(RecvError::Lagged(skipped)) => {
            debug!(skipped, "Dashboard fell behind, resuming from newest update");
        }
        Err(RecvError::Closed) => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// React to a message from the dashboard.
async fn answer_client(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, axum::Error>>,
) -> ControlFlow<()> {
    match incoming {
        Some(Ok(Message::Ping(payload))) => {
            if socket.send(Message::Pong(payload)).await.is_err() {
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        }
        Some(Ok(Message::Close(_)) | Err(_)) | None => ControlFlow::Break(()),
        Some(Ok(_)) => ControlFlow::Continue(()),
    }
}
