//! REST endpoint handlers for the Pulse server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness check |
//! | `GET` | `/platforms/` | Platform code and name table |
//! | `GET` | `/post/list/` | Proxy to the upstream listing service |
//! | `GET` | `/post/mock/` | Freshly generated mock dataset |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use pulse_core::{DateRange, generate_dataset};
use pulse_types::{Dataset, Platform, PlatformInfo};
use tracing::debug;

use crate::error::ApiError;
use crate::extract::QueryParams;
use crate::state::AppState;

/// Longest span the mock endpoint will generate in one request.
pub const MAX_MOCK_RANGE_DAYS: i64 = 366;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters for `GET /post/list/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Platform code forwarded to the upstream service.
    pub platform: Option<String>,
}

impl From<&QueryParams> for ListQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            platform: params.first("platform").map(str::to_owned),
        }
    }
}

/// Query parameters for `GET /post/mock/`.
///
/// Dates accept `YYYY-MM-DD` (midnight UTC) or RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockQuery {
    /// First day of the range; defaults to the configured lookback.
    pub start_date: Option<String>,
    /// Last day of the range; defaults to now.
    pub end_date: Option<String>,
}

impl From<&QueryParams> for MockQuery {
    fn from(params: &QueryParams) -> Self {
        Self {
            start_date: params.first("start_date").map(str::to_owned),
            end_date: params.first("end_date").map(str::to_owned),
        }
    }
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report that the server is up.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// GET /platforms/
// ---------------------------------------------------------------------------

/// List every platform the dashboard tracks.
pub async fn list_platforms() -> Json<Vec<PlatformInfo>> {
    Json(Platform::ALL.into_iter().map(Platform::info).collect())
}

// ---------------------------------------------------------------------------
// GET /post/list/?platform=<code>
// ---------------------------------------------------------------------------

/// Forward a list request to the upstream service.
///
/// A missing or empty `platform` fails with 400 before any outbound
/// call; when the parameter repeats, the first value wins. On success
/// the upstream status and JSON body bytes are relayed unchanged; any
/// upstream failure becomes a 500.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Result<impl IntoResponse, ApiError> {
    let platform = ListQuery::from(&params)
        .platform
        .filter(|p| !p.is_empty())
        .ok_or(ApiError::MissingParameter("platform"))?;

    debug!(platform = %platform, upstream = state.upstream.base_url(), "Proxying post list");
    let response = state.upstream.fetch_posts(&platform).await?;

    Ok((
        response.status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    ))
}

// ---------------------------------------------------------------------------
// GET /post/mock/?start_date=&end_date=
// ---------------------------------------------------------------------------

/// Generate a mock dataset for the requested date range.
///
/// An end date before the start date is not an error; every platform
/// is returned with an empty post list.
pub async fn mock_posts(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Result<Json<Dataset>, ApiError> {
    let query = MockQuery::from(&params);
    let start = parse_optional_date("start_date", query.start_date.as_deref())?;
    let end = parse_optional_date("end_date", query.end_date.as_deref())?;
    let range = DateRange::resolve(start, end, Utc::now(), state.lookback_days);

    if range.end.signed_duration_since(range.start) > TimeDelta::days(MAX_MOCK_RANGE_DAYS) {
        return Err(ApiError::InvalidQuery(format!(
            "date range exceeds {MAX_MOCK_RANGE_DAYS} days"
        )));
    }

    let dataset = {
        let mut rng = rand::rng();
        generate_dataset(&range, &mut rng)
    };
    Ok(Json(dataset))
}

/// Parse a date parameter. Empty values count as absent.
fn parse_optional_date(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| {
            ApiError::InvalidQuery(format!(
                "{name} must be YYYY-MM-DD or RFC 3339, got {raw:?}"
            ))
        })
}
