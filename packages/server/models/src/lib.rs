#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the violation map server.
//!
//! These types are deserialized from query strings and JSON bodies. Date
//! fields arrive as strings because browsers serialize `Date` objects to
//! full ISO 8601 timestamps; [`parse_date_input`] truncates either form to
//! a calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parses a date string into a calendar date.
///
/// Accepts a full RFC 3339 timestamp (`2024-09-01T00:00:00.000Z`), a naive
/// datetime (`2024-09-01T00:00:00`), or a plain date (`2024-09-01`).
#[must_use]
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters carrying an optional symbolic period.
///
/// `period` stays a raw string so handlers can answer bad values with a
/// message naming the accepted set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQueryParams {
    /// Symbolic period: `day`, `week`, `month`, or `year`.
    pub period: Option<String>,
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQueryParams {
    /// 4-digit year.
    pub year: Option<i32>,
    /// Month 1-12.
    pub month: Option<u32>,
    /// Day of month 1-31.
    pub day: Option<u32>,
    /// Symbolic period used when no explicit date part is given.
    pub period: Option<String>,
    /// Overrides the client-date flag. Defaults to whether any explicit
    /// date part was supplied, matching the dashboard's behavior.
    pub date_from_frontend: Option<bool>,
}

/// Query parameters for the yearly totals endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearQueryParams {
    /// 4-digit year.
    pub year: Option<i32>,
}

/// Query parameters for the interval totals endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GranularityQueryParams {
    /// Bucket granularity: `hourly`, `daily`, `monthly`, or `yearly`.
    pub granularity: Option<String>,
}

/// JSON body for the range endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBody {
    /// Range start.
    pub from: String,
    /// Range end.
    pub to: String,
    /// Return only the record count.
    pub count_only: Option<bool>,
    /// Return a window summary instead of the record list.
    pub summary: Option<bool>,
    /// Overrides the client-date flag. Defaults to `true`: this endpoint
    /// is called by the dashboard with browser-serialized dates.
    pub date_from_frontend: Option<bool>,
}

/// JSON body carrying a date range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeBody {
    /// Range start.
    pub from: Option<String>,
    /// Range end.
    pub to: Option<String>,
}

/// Query parameters for the search endpoint. Exactly one filter branch is
/// used, checked in field order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    /// Violation type filter.
    pub violation_type: Option<String>,
    /// Street name filter (case-insensitive).
    pub street_name: Option<String>,
    /// Latitude for exact-location filtering.
    pub lat: Option<f64>,
    /// Longitude for exact-location filtering.
    pub long: Option<f64>,
}
