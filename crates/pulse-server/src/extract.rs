//! Request extractors whose failures are reported as [`ApiError`].
//!
//! Axum's own `Query<T>` answers a bad query string with a plain-text
//! 400 before the handler runs. [`QueryParams`] keeps the raw pairs
//! instead, so handlers decide what a repeated or blank parameter means
//! and every rejection still carries the JSON error body.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::error::ApiError;

/// The request's query string as ordered `(name, value)` pairs.
///
/// Repeated names are kept in order; [`QueryParams::first`] reads the
/// first occurrence, the same way form-style frameworks do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    /// Value of the first parameter called `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
        Ok(Self(pairs))
    }
}
