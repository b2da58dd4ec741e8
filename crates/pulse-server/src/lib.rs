//! HTTP and `WebSocket` server for the Pulse dashboard backend.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Upstream proxy** (`/post/list/`) forwarding list requests to the
//!   real post-listing service with a bounded timeout
//! - **Mock data** (`/post/mock/`) and the platform table (`/platforms/`)
//! - **`WebSocket` endpoint** (`/ws/updates`) streaming `data_update`
//!   frames produced by the broadcast loop via
//!   [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! One [`AppState`] is built at startup and shared by the router and
//! the broadcast loop. The proxy and the loop share no mutable state;
//! the only thing they have in common is the mock generator in
//! `pulse-core`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod upstream;
pub mod ws;

pub use error::ApiError;
pub use extract::QueryParams;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use startup::start_broadcast;
pub use state::{AppState, UpdateFrame};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResponse};
