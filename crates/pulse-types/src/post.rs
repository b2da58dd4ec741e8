//! Post records and their engagement metrics.
//!
//! Field names follow the upstream post-listing service so mock and
//! proxied data are interchangeable on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-kind reaction counts plus their total.
///
/// Serialized with `PascalCase` keys (`Like`, `Love`, ..., `Total`).
/// Build through [`Reactions::new`] so `total` always equals the sum of
/// the seven named kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "PascalCase")]
#[ts(export, export_to = "bindings/")]
pub struct Reactions {
    /// Like reactions.
    pub like: u32,
    /// Love reactions.
    pub love: u32,
    /// Sad reactions.
    pub sad: u32,
    /// Haha reactions.
    pub haha: u32,
    /// Wow reactions.
    pub wow: u32,
    /// Angry reactions.
    pub angry: u32,
    /// Care reactions.
    pub care: u32,
    /// Sum of every named kind.
    pub total: u32,
}

impl Reactions {
    /// Build a reaction record, computing `total` from the named kinds.
    pub const fn new(
        like: u32,
        love: u32,
        sad: u32,
        haha: u32,
        wow: u32,
        angry: u32,
        care: u32,
    ) -> Self {
        let mut reactions = Self {
            like,
            love,
            sad,
            haha,
            wow,
            angry,
            care,
            total: 0,
        };
        reactions.total = reactions.sum_of_kinds();
        reactions
    }

    /// Saturating sum of the seven named reaction kinds.
    pub const fn sum_of_kinds(&self) -> u32 {
        self.like
            .saturating_add(self.love)
            .saturating_add(self.sad)
            .saturating_add(self.haha)
            .saturating_add(self.wow)
            .saturating_add(self.angry)
            .saturating_add(self.care)
    }
}

/// Post author summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Follower count at the time the post was captured.
    pub followers: u32,
}

/// One social-media post with its engagement metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Post {
    /// Identifier, `<code>_<YYYYMMDD>_<index>` for generated posts.
    #[serde(rename = "_id")]
    pub id: String,
    /// Post body text.
    pub post_text: String,
    /// Canonical URL of the post.
    pub post_url: String,
    /// Browser URL of the post.
    pub web_url: String,
    /// Reaction breakdown.
    pub reactions: Reactions,
    /// Comment count.
    pub total_comments: u32,
    /// Share count.
    pub total_shares: u32,
    /// View count.
    pub total_views: u32,
    /// Engagement vitality score, two decimal places.
    pub vitality_score: f64,
    /// Attached image URLs.
    pub featured_image: Vec<String>,
    /// Screenshot URL, if one was captured.
    pub url_screenshot: Option<String>,
    /// Platform display name.
    pub source: String,
    /// Source identifier (`<code>_source`).
    pub source_id: String,
    /// Named entities extracted from the text.
    pub ner_entities: Vec<String>,
    /// When the post was published.
    pub posted_at: DateTime<Utc>,
    /// Author summary.
    pub author: Author,
}
