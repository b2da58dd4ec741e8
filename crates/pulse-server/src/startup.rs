//! Broadcast loop startup for the binary.
//!
//! The loop publishes through the same [`AppState`] the router reads,
//! so every `WebSocket` client subscribed via `/ws/updates` receives its
//! frames.

use std::sync::Arc;

use pulse_core::{BroadcastSettings, TokioSleeper, spawn_broadcast_loop};
use tokio::task::JoinHandle;

use crate::state::AppState;

/// Start the `data_update` broadcast loop against the shared state.
pub fn start_broadcast(state: Arc<AppState>, settings: BroadcastSettings) -> JoinHandle<()> {
    spawn_broadcast_loop(state, TokioSleeper, settings)
}
