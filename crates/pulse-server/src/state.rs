//! Shared application state for the Pulse server.
//!
//! [`AppState`] is built once at startup and handed both to the Axum
//! router and to the broadcast loop. It owns the real-time broadcast
//! channel and the upstream client; there is no other shared state.

use std::sync::Arc;

use axum::extract::ws::Utf8Bytes;
use pulse_core::{DEFAULT_LOOKBACK_DAYS, UpdatePublisher};
use pulse_types::DataUpdate;
use tokio::sync::broadcast;
use tracing::warn;

use crate::upstream::UpstreamClient;

/// Capacity of the `data_update` broadcast channel.
///
/// A subscriber more than this many frames behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest.
const BROADCAST_CAPACITY: usize = 16;

/// A published `data_update` together with its JSON text.
///
/// The text is encoded once per publish and shared by every socket,
/// which only clones the reference-counted buffer.
#[derive(Debug)]
pub struct UpdateFrame {
    /// The update as generated.
    pub update: DataUpdate,
    /// `update` serialized as a JSON text frame.
    pub text: Utf8Bytes,
}

impl UpdateFrame {
    /// Encode `update` into a frame.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the update cannot be encoded.
    pub fn encode(update: DataUpdate) -> Result<Self, serde_json::Error> {
        let text = serde_json::to_string(&update)?;
        Ok(Self {
            update,
            text: text.into(),
        })
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Broadcast sender for `data_update` frames.
    pub tx: broadcast::Sender<Arc<UpdateFrame>>,
    /// Client for the upstream post-listing service.
    pub upstream: UpstreamClient,
    /// Default history window for the mock data endpoint.
    pub lookback_days: u32,
}

impl AppState {
    /// Create state around an upstream client with no subscribers.
    pub fn new(upstream: UpstreamClient) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            upstream,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    /// Override the mock endpoint's default history window.
    #[must_use]
    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// Subscribe to `data_update` frames.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<UpdateFrame>> {
        self.tx.subscribe()
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl UpdatePublisher for AppState {
    fn publish(&self, update: DataUpdate) -> usize {
        let frame = match UpdateFrame::encode(update) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Failed to encode data_update, frame dropped");
                return 0;
            }
        };
        // send fails only when nobody is subscribed, which is normal
        // before the first WebSocket client connects.
        self.tx.send(Arc::new(frame)).unwrap_or(0)
    }
}
