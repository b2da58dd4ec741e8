//! Integration tests for `data_update` delivery through `AppState`.
//!
//! The broadcast loop runs against the same state the router uses, on
//! Tokio's paused clock, so thirty-second periods elapse instantly.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pulse_core::{BroadcastSettings, UpdatePublisher, UpstreamConfig};
use pulse_server::startup::start_broadcast;
use pulse_server::state::AppState;
use pulse_server::upstream::UpstreamClient;
use pulse_types::{DATA_UPDATE_EVENT, DataUpdate, Dataset, Platform};
use tokio::sync::broadcast::error::TryRecvError;

fn make_state() -> Arc<AppState> {
    let upstream = UpstreamClient::new(&UpstreamConfig::default()).unwrap();
    Arc::new(AppState::new(upstream))
}

#[test]
fn publish_without_subscribers_reports_zero() {
    let state = make_state();
    assert_eq!(state.subscriber_count(), 0);
    assert_eq!(state.publish(DataUpdate::new(Dataset::new())), 0);
}

#[tokio::test]
async fn every_subscriber_receives_the_same_frame() {
    let state = make_state();
    let mut a = state.subscribe();
    let mut b = state.subscribe();

    assert_eq!(state.publish(DataUpdate::new(Dataset::new())), 2);

    let from_a = a.recv().await.unwrap();
    let from_b = b.recv().await.unwrap();
    assert!(Arc::ptr_eq(&from_a, &from_b));
    assert_eq!(from_a.update.event, DATA_UPDATE_EVENT);
    assert!(from_a.text.as_str().contains(DATA_UPDATE_EVENT));
}

#[tokio::test(start_paused = true)]
async fn loop_delivers_updates_to_subscribers() {
    let state = make_state();
    let mut rx = state.subscribe();

    let handle = start_broadcast(Arc::clone(&state), BroadcastSettings::default());
    tokio::time::sleep(Duration::from_secs(61)).await;
    handle.abort();

    let mut received = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(frame) => received.push(frame),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(_)) => {}
        }
    }

    assert!(received.len() >= 2, "only {} updates", received.len());
    for frame in &received {
        assert_eq!(frame.update.event, DATA_UPDATE_EVENT);
        for platform in Platform::ALL {
            assert!(frame.update.data.contains(platform));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn late_subscriber_only_sees_later_frames() {
    let state = make_state();
    let handle = start_broadcast(Arc::clone(&state), BroadcastSettings::default());

    // First frame goes out with nobody listening.
    tokio::time::sleep(Duration::from_secs(1)).await;
    let mut rx = state.subscribe();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    tokio::time::sleep(Duration::from_secs(30)).await;
    handle.abort();
    assert!(rx.try_recv().is_ok());
}
