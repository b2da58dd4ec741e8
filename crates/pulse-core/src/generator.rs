//! Randomized mock post generation.
//!
//! [`generate_dataset`] walks every calendar day of a [`DateRange`] for
//! every platform in [`Platform::ALL`] and emits one or two posts per
//! day with independently randomized engagement counters:
//!
//! | Field | Range (inclusive) |
//! |-------|-------------------|
//! | `Like` | 0--100 |
//! | `Love` | 0--50 |
//! | `Sad`, `Haha`, `Wow` | 0--10 |
//! | `Angry`, `Care` | 0--5 |
//! | comments | 0--50 |
//! | shares | 0--30 |
//! | views | 100--10000 |
//! | vitality | 0.1--10.0, two decimals |
//! | followers | 100--10000 |
//!
//! Output is not reproducible across calls unless the caller supplies a
//! seeded RNG.

use chrono::{DateTime, TimeDelta, Utc};
use pulse_types::{Author, Dataset, Platform, Post, Reactions};
use rand::Rng;

/// Lookback used when a range has no explicit start.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Inclusive span of days to generate posts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day (its time-of-day is carried into every post timestamp).
    pub start: DateTime<Utc>,
    /// Last instant included in the walk.
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range from explicit bounds. `end < start` is allowed and
    /// covers zero days.
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Fill missing bounds: the start defaults to `lookback_days` before
    /// `now`, the end defaults to `now`.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        lookback_days: u32,
    ) -> Self {
        let start = start.unwrap_or_else(|| {
            now.checked_sub_signed(TimeDelta::days(i64::from(lookback_days)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        Self {
            start,
            end: end.unwrap_or(now),
        }
    }

    /// Every instant `start + n days` that is `<= end`.
    pub fn days(&self) -> impl Iterator<Item = DateTime<Utc>> {
        let end = self.end;
        std::iter::successors(Some(self.start).filter(|s| *s <= end), move |day| {
            day.checked_add_signed(TimeDelta::days(1))
                .filter(|next| *next <= end)
        })
    }
}

/// Generate a dataset for `range` using the supplied RNG.
///
/// Every platform gets an entry, even when the range covers no days.
pub fn generate_dataset(range: &DateRange, rng: &mut impl Rng) -> Dataset {
    let mut dataset = Dataset::new();
    for platform in Platform::ALL {
        let mut posts = Vec::new();
        for day in range.days() {
            let per_day = rng.random_range(1..=2_u32);
            for index in 0..per_day {
                posts.push(generate_post(platform, day, index, rng));
            }
        }
        dataset.insert(platform, posts);
    }
    dataset
}

/// Generate a dataset with the thread RNG and the current wall clock.
///
/// Missing bounds resolve as described in [`DateRange::resolve`].
pub fn generate_sample_data(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    lookback_days: u32,
) -> Dataset {
    let range = DateRange::resolve(start, end, Utc::now(), lookback_days);
    generate_dataset(&range, &mut rand::rng())
}

/// Build one post for `platform` on `day`. `index` is the post's
/// position within that day and becomes part of its `_id`.
pub fn generate_post(
    platform: Platform,
    day: DateTime<Utc>,
    index: u32,
    rng: &mut impl Rng,
) -> Post {
    let code = platform.code();
    let name = platform.display_name();
    let id = format!("{code}_{}_{index}", day.format("%Y%m%d"));
    let url = format!("https://{}.com/post/{id}", name.to_lowercase());

    let reactions = Reactions::new(
        rng.random_range(0..=100),
        rng.random_range(0..=50),
        rng.random_range(0..=10),
        rng.random_range(0..=10),
        rng.random_range(0..=10),
        rng.random_range(0..=5),
        rng.random_range(0..=5),
    );

    Post {
        post_text: format!(
            "Sample post {index} from {name} on {}",
            day.format("%Y-%m-%d")
        ),
        post_url: url.clone(),
        web_url: url,
        reactions,
        total_comments: rng.random_range(0..=50),
        total_shares: rng.random_range(0..=30),
        total_views: rng.random_range(100..=10_000),
        vitality_score: round_two_places(rng.random_range(0.1..=10.0)),
        featured_image: Vec::new(),
        url_screenshot: None,
        source: name.to_owned(),
        source_id: format!("{code}_source"),
        ner_entities: Vec::new(),
        posted_at: day,
        author: Author {
            name: format!("Author {code}"),
            followers: rng.random_range(100..=10_000),
        },
        id,
    }
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
