//! Shared type definitions for the Pulse dashboard backend.
//!
//! Every crate in the workspace speaks these types: the mock generator
//! produces them, the broadcast loop ships them to WebSocket clients,
//! and the dashboard consumes the `TypeScript` bindings that `ts-rs`
//! writes to `bindings/`.
//!
//! # Modules
//!
//! - [`platform`] -- the fixed platform table and its wire codes
//! - [`post`] -- post records, reactions, and author info
//! - [`dataset`] -- per-platform collections and the update envelope

pub mod dataset;
pub mod platform;
pub mod post;

pub use dataset::{DATA_UPDATE_EVENT, DataUpdate, Dataset, PlatformPosts};
pub use platform::{Platform, PlatformInfo, UnknownPlatform};
pub use post::{Author, Post, Reactions};
