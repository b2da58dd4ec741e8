//! Periodic mock data broadcast.
//!
//! [`run_broadcast_loop`] generates a fresh [`Dataset`] on a fixed
//! period and hands it to an [`UpdatePublisher`] wrapped in a
//! `data_update` frame. It never returns; the caller owns the task and
//! aborts it at shutdown.
//!
//! Each tick runs as its own Tokio task. A tick that panics is logged
//! at `warn` and the loop moves on to the next period.
//!
//! Time is injected through [`Sleeper`] so tests can drive the loop
//! without real delays.
//!
//! [`Dataset`]: pulse_types::Dataset

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pulse_types::DataUpdate;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BroadcastConfig;
use crate::generator::generate_sample_data;

/// Destination for broadcast frames.
///
/// Implementations fan the update out to whoever is listening. A
/// publisher with no subscribers is not an error and returns 0.
pub trait UpdatePublisher: Send + Sync + 'static {
    /// Deliver one update and return how many subscribers received it.
    fn publish(&self, update: DataUpdate) -> usize;
}

/// Source of delays between ticks.
pub trait Sleeper: Send + Sync + 'static {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Sleeper`] backed by [`tokio::time::sleep`].
///
/// Honors Tokio's paused test clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Timing and data window for the broadcast loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSettings {
    /// Delay between the end of one emission and the start of the next.
    pub interval: Duration,
    /// Days of history in each generated dataset.
    pub lookback_days: u32,
}

impl From<&BroadcastConfig> for BroadcastSettings {
    fn from(config: &BroadcastConfig) -> Self {
        Self {
            interval: config.interval(),
            lookback_days: config.lookback_days,
        }
    }
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self::from(&BroadcastConfig::default())
    }
}

/// Emit a `data_update` immediately, then once per `settings.interval`,
/// forever.
pub async fn run_broadcast_loop<P, S>(publisher: Arc<P>, sleeper: S, settings: BroadcastSettings)
where
    P: UpdatePublisher,
    S: Sleeper,
{
    info!(
        interval_secs = settings.interval.as_secs(),
        lookback_days = settings.lookback_days,
        "Broadcast loop starting"
    );

    let mut tick: u64 = 0;
    loop {
        tick = tick.saturating_add(1);

        let publisher = Arc::clone(&publisher);
        let lookback_days = settings.lookback_days;
        let outcome = tokio::spawn(async move {
            let dataset = generate_sample_data(None, None, lookback_days);
            let posts = dataset.total_posts();
            let receivers = publisher.publish(DataUpdate::new(dataset));
            (posts, receivers)
        })
        .await;

        match outcome {
            Ok((posts, receivers)) => debug!(tick, posts, receivers, "data_update emitted"),
            Err(e) => warn!(tick, error = %e, "Broadcast tick failed, continuing"),
        }

        sleeper.sleep(settings.interval).await;
    }
}

/// Start [`run_broadcast_loop`] on a background Tokio task.
///
/// The loop runs until the returned handle is aborted or the runtime
/// shuts down.
pub fn spawn_broadcast_loop<P, S>(
    publisher: Arc<P>,
    sleeper: S,
    settings: BroadcastSettings,
) -> JoinHandle<()>
where
    P: UpdatePublisher,
    S: Sleeper,
{
    tokio::spawn(run_broadcast_loop(publisher, sleeper, settings))
}
