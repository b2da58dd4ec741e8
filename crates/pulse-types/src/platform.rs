//! The fixed set of social-media platforms the dashboard tracks.
//!
//! Each platform is identified on the wire by a single-letter code
//! (`F`, `I`, `X`, `Y`, `T`). The code is what appears as a key in a
//! [`Dataset`](crate::Dataset) and as the `platform` query parameter
//! forwarded to the upstream service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A social-media platform identified by its single-letter code.
///
/// Variant order matches [`Platform::ALL`] and determines the key
/// order of a serialized [`Dataset`](crate::Dataset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Platform {
    /// Facebook (`F`).
    #[serde(rename = "F")]
    Facebook,
    /// Instagram (`I`).
    #[serde(rename = "I")]
    Instagram,
    /// X, formerly Twitter (`X`).
    #[serde(rename = "X")]
    X,
    /// `YouTube` (`Y`).
    #[serde(rename = "Y")]
    YouTube,
    /// Telegram (`T`).
    #[serde(rename = "T")]
    Telegram,
}

impl Platform {
    /// Every configured platform, in display order.
    pub const ALL: [Self; 5] = [
        Self::Facebook,
        Self::Instagram,
        Self::X,
        Self::YouTube,
        Self::Telegram,
    ];

    /// The single-letter wire code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Facebook => "F",
            Self::Instagram => "I",
            Self::X => "X",
            Self::YouTube => "Y",
            Self::Telegram => "T",
        }
    }

    /// Human-readable platform name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::X => "X",
            Self::YouTube => "YouTube",
            Self::Telegram => "Telegram",
        }
    }

    /// Look up a platform by its wire code. Matching is exact.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    /// Summary record for the `/platforms/` listing.
    pub fn info(self) -> PlatformInfo {
        PlatformInfo {
            code: self,
            name: self.display_name().to_owned(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not a known platform code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform code: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownPlatform(s.to_owned()))
    }
}

/// Code and display name pair, as listed by the platforms endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlatformInfo {
    /// Wire code.
    pub code: Platform,
    /// Display name.
    pub name: String,
}
