//! Core logic for the Pulse dashboard backend.
//!
//! - [`config`] -- typed `pulse-config.yaml` loading with env overrides
//! - [`generator`] -- randomized mock post datasets over a date range
//! - [`broadcast`] -- the periodic `data_update` emission loop
//!
//! Nothing here touches HTTP; the server crate injects its broadcaster
//! through [`broadcast::UpdatePublisher`].

pub mod broadcast;
pub mod config;
pub mod generator;

pub use broadcast::{
    BroadcastSettings, Sleeper, TokioSleeper, UpdatePublisher, run_broadcast_loop,
    spawn_broadcast_loop,
};
pub use config::{
    BroadcastConfig, ConfigError, MAX_LOOKBACK_DAYS, PulseConfig, ServerSection, UpstreamConfig,
};
pub use generator::{
    DEFAULT_LOOKBACK_DAYS, DateRange, generate_dataset, generate_post, generate_sample_data,
};
