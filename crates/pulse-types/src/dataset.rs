//! Per-platform post collections and the real-time update envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::platform::Platform;
use crate::post::Post;

/// Event name carried by every [`DataUpdate`] frame.
pub const DATA_UPDATE_EVENT: &str = "data_update";

/// The posts produced for one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlatformPosts {
    /// Posts in generation order (by day, then index within the day).
    pub posts: Vec<Post>,
}

/// Mapping from platform to its posts, serialized as a JSON object
/// keyed by platform code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    platforms: BTreeMap<Platform, PlatformPosts>,
}

impl Dataset {
    /// Create an empty dataset.
    pub const fn new() -> Self {
        Self {
            platforms: BTreeMap::new(),
        }
    }

    /// Set the post list for a platform, replacing any previous list.
    pub fn insert(&mut self, platform: Platform, posts: Vec<Post>) {
        self.platforms.insert(platform, PlatformPosts { posts });
    }

    /// Posts for a platform, or `None` if the platform has no entry.
    pub fn posts(&self, platform: Platform) -> Option<&[Post]> {
        self.platforms.get(&platform).map(|p| p.posts.as_slice())
    }

    /// Whether the platform has an entry (possibly with zero posts).
    pub fn contains(&self, platform: Platform) -> bool {
        self.platforms.contains_key(&platform)
    }

    /// Iterate over platforms and their posts in code order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &[Post])> {
        self.platforms
            .iter()
            .map(|(platform, entry)| (*platform, entry.posts.as_slice()))
    }

    /// Number of platform entries.
    pub fn platform_count(&self) -> usize {
        self.platforms.len()
    }

    /// Number of posts across all platforms.
    pub fn total_posts(&self) -> usize {
        self.platforms.values().map(|p| p.posts.len()).sum()
    }
}

/// Frame pushed to real-time subscribers on every broadcast tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DataUpdate {
    /// Event name, always [`DATA_UPDATE_EVENT`].
    pub event: String,
    /// Full dataset for this tick.
    #[ts(as = "BTreeMap<Platform, PlatformPosts>")]
    pub data: Dataset,
}

impl DataUpdate {
    /// Wrap a dataset in a `data_update` frame.
    pub fn new(data: Dataset) -> Self {
        Self {
            event: DATA_UPDATE_EVENT.to_owned(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn serializes_as_object_keyed_by_code() {
        let mut dataset = Dataset::new();
        dataset.insert(Platform::Instagram, Vec::new());
        dataset.insert(Platform::Facebook, Vec::new());

        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json, serde_json::json!({"F": {"posts": []}, "I": {"posts": []}}));
    }

    #[test]
    fn empty_entry_still_counts_as_present() {
        let mut dataset = Dataset::new();
        dataset.insert(Platform::X, Vec::new());
        assert!(dataset.contains(Platform::X));
        assert_eq!(dataset.posts(Platform::X).map(<[Post]>::len), Some(0));
        assert!(!dataset.contains(Platform::Telegram));
        assert_eq!(dataset.total_posts(), 0);
    }

    #[test]
    fn update_envelope_names_event() {
        let update = DataUpdate::new(Dataset::new());
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["event"], "data_update");
        assert!(json["data"].is_object());
    }
}
