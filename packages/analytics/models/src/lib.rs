#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation query result types and tool definitions for the AI agent.
//!
//! Defines the input/output types for each aggregation operation the engine
//! exposes, along with JSON Schema descriptions for the LLM tool-use
//! protocol. Each operation maps 1:1 onto an invokable tool.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use violation_map_temporal::{Period, TimeWindow};
use violation_map_violation_models::ViolationRecord;

/// Bucket granularity for interval histogram queries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    /// Hour-of-day buckets (0-23).
    Hourly,
    /// Day-of-month buckets (01-31).
    Daily,
    /// Month-of-year buckets (01-12).
    Monthly,
    /// Calendar-year buckets.
    Yearly,
}

impl Granularity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Hourly, Self::Daily, Self::Monthly, Self::Yearly]
    }
}

/// Result of a grouped-maximum aggregation: the highest per-key count in a
/// window together with every key that reaches it.
///
/// `max_count == 0` implies `winners` is empty. Ties are never broken;
/// the dashboard rotates through all tied leaders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedMax {
    /// The highest occurrence count among all keys.
    pub max_count: u64,
    /// Every key tied at `max_count`, in deterministic order.
    pub winners: Vec<String>,
}

impl GroupedMax {
    /// The zero aggregate for an empty window.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            max_count: 0,
            winners: Vec::new(),
        }
    }
}

/// Grouped-maximum aggregates for the three statistics dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationsStats {
    /// Most violated street(s).
    pub street_name: GroupedMax,
    /// Most violating vehicle type(s).
    pub vehicle_type: GroupedMax,
    /// Most frequent violation type(s).
    pub violation_type: GroupedMax,
}

impl ViolationsStats {
    /// All-zero stats for an empty window.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            street_name: GroupedMax::empty(),
            vehicle_type: GroupedMax::empty(),
            violation_type: GroupedMax::empty(),
        }
    }
}

/// Sentinel value used for the busiest day when a window has no records.
pub const NO_DATA_DAY: &str = "No data";

/// The single date with the most violations in a window.
///
/// Unlike [`GroupedMax`], ties report only the first (earliest) date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighestDay {
    /// The date as `YYYY-MM-DD`, or [`NO_DATA_DAY`].
    pub day: String,
    /// Violation count on that date.
    pub count: u64,
}

impl HighestDay {
    /// The sentinel for an empty window.
    #[must_use]
    pub fn no_data() -> Self {
        Self {
            day: NO_DATA_DAY.to_string(),
            count: 0,
        }
    }
}

/// Full summary of a resolved window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationSummary {
    /// Total records in the window.
    pub total_violations: u64,
    /// The busiest single day.
    pub highest_violated_day: HighestDay,
    /// Per-dimension grouped maxima.
    pub violations_stats: ViolationsStats,
}

impl ViolationSummary {
    /// The zero summary returned for windows with no records.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_violations: 0,
            highest_violated_day: HighestDay::no_data(),
            violations_stats: ViolationsStats::empty(),
        }
    }
}

/// Parameters for the summary operation.
///
/// Explicit date parts take precedence over the symbolic `period`; see the
/// engine's window-resolution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryParams {
    /// 4-digit year.
    pub year: Option<i32>,
    /// Month in `[1, 12]`.
    pub month: Option<u32>,
    /// Day of month in `[1, 31]`.
    pub day: Option<u32>,
    /// Symbolic period used when no explicit date part is given.
    pub period: Option<Period>,
    /// Whether the date parts were serialized by a browser and need the
    /// one-day client-date correction.
    #[serde(default)]
    pub date_from_frontend: bool,
}

/// Result of the per-period dimension statistics operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    /// The period the stats were computed for.
    pub period: Period,
    /// The resolved rolling window.
    pub window: TimeWindow,
    /// Per-dimension grouped maxima.
    pub stats: ViolationsStats,
}

/// Result of a period-over-period comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// The compared period.
    pub period: Period,
    /// The rolling current window.
    pub current_window: TimeWindow,
    /// The fixed preceding window.
    pub previous_window: TimeWindow,
    /// Record count in the current window.
    pub current: u64,
    /// Record count in the previous window.
    pub previous: u64,
    /// Percentage difference: `None` when both counts are zero, `100` when
    /// only the previous count is zero, otherwise
    /// `(current - previous) / previous * 100`.
    pub diff: Option<f64>,
    /// Human-readable description for the agent.
    pub description: String,
}

/// One non-empty histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalBucket {
    /// Bucket label: unpadded hour (`"8"`), zero-padded day/month (`"01"`),
    /// or 4-digit year.
    pub bucket_key: String,
    /// Records in the bucket, always positive.
    pub count: u64,
}

/// Parameters for the interval histogram operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramParams {
    /// Range start (inclusive).
    pub from: NaiveDate,
    /// Range end (inclusive).
    pub to: NaiveDate,
    /// Bucket granularity.
    pub granularity: Granularity,
    /// Whether the range was serialized by a browser.
    #[serde(default)]
    pub date_from_frontend: bool,
}

/// Result of the interval histogram operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramResult {
    /// Bucket granularity the histogram was computed at.
    pub granularity: Granularity,
    /// The queried window after any client-date correction.
    pub window: TimeWindow,
    /// Non-empty buckets in ascending bucket order.
    pub buckets: Vec<IntervalBucket>,
}

/// Parameters for the range query operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeParams {
    /// Range start (inclusive).
    pub from: NaiveDate,
    /// Range end (inclusive).
    pub to: NaiveDate,
    /// Return only the record count.
    #[serde(default)]
    pub count_only: bool,
    /// Return a window summary instead of the record list.
    #[serde(default)]
    pub summary: bool,
    /// Whether the range was serialized by a browser.
    #[serde(default)]
    pub date_from_frontend: bool,
}

/// Result of the range query operation. `count_only` wins over `summary`,
/// which wins over the full record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeQueryResult {
    /// Record count only.
    Count {
        /// Number of records in the range.
        total: u64,
    },
    /// Window summary.
    Summary(ViolationSummary),
    /// The full record list.
    Records(Vec<ViolationRecord>),
}

/// Parameters for the street-name filter operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetQuery {
    /// Street to match, case-insensitively.
    pub street_name: String,
    /// Optional range start.
    pub from: Option<NaiveDate>,
    /// Optional range end.
    pub to: Option<NaiveDate>,
}

/// Parameters for the violation-type filter operation.
///
/// The type is carried as a string so unsupported values surface as a
/// field-level validation error rather than a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationTypeQuery {
    /// Violation type name.
    pub violation_type: String,
    /// Optional range start.
    pub from: Option<NaiveDate>,
    /// Optional range end.
    pub to: Option<NaiveDate>,
}

/// Parameters for the exact-location filter operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    /// Detection latitude.
    pub latitude: f64,
    /// Detection longitude.
    pub longitude: f64,
}

/// Result of the yearly total operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotal {
    /// The queried year.
    pub year: i32,
    /// Total records in that year.
    pub total: u64,
}

/// Enumeration of all tool names the AI agent can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Summary of violations for a date or period.
    GetSummary,
    /// Per-dimension stats for the current period.
    GetStatsForPeriod,
    /// Compare current and previous period counts.
    GetComparison,
    /// Records, count, or summary for an explicit range.
    GetAllInRange,
    /// Interval histogram over a range.
    GetHistogram,
    /// Total violations in a year.
    GetTotalForYear,
    /// Records on a street.
    GetByStreetName,
    /// Records of a violation type.
    GetByViolationType,
    /// Records at an exact coordinate.
    GetByLocation,
    /// Every recorded violation.
    GetAllViolations,
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetSummary => write!(f, "get_summary"),
            Self::GetStatsForPeriod => write!(f, "get_stats_for_period"),
            Self::GetComparison => write!(f, "get_comparison"),
            Self::GetAllInRange => write!(f, "get_all_in_range"),
            Self::GetHistogram => write!(f, "get_histogram"),
            Self::GetTotalForYear => write!(f, "get_total_for_year"),
            Self::GetByStreetName => write!(f, "get_by_street_name"),
            Self::GetByViolationType => write!(f, "get_by_violation_type"),
            Self::GetByLocation => write!(f, "get_by_location"),
            Self::GetAllViolations => write!(f, "get_all_violations"),
        }
    }
}

/// Returns the JSON Schema definitions for all available tools.
///
/// These are used in the LLM tool-use protocol to describe what tools the
/// assistant can invoke. Dates passed by the model are server-normalized,
/// so none of these set the client-date flag.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
            "name": "get_summary",
            "description": "Retrieve the total violations, per-dimension statistics, and the highest-violation day for a date. For the current year, month, week, or day pass only 'period'. For a specific date pass year, month, and/or day.",
            "parameters": {
                "type": "object",
                "properties": {
                    "year": { "type": "integer", "description": "4-digit year (e.g. 2024)" },
                    "month": { "type": "integer", "description": "Month 1-12" },
                    "day": { "type": "integer", "description": "Day of month 1-31" },
                    "period": { "type": "string", "enum": ["day", "week", "month", "year"], "description": "Symbolic current period" }
                },
                "required": []
            }
        }),
        serde_json::json!({
            "name": "get_stats_for_period",
            "description": "Find the most violated street(s), vehicle type(s), and violation type(s) in the current day, week, month, or year. All tied leaders are reported.",
            "parameters": {
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["day", "week", "month", "year"], "description": "Symbolic current period" }
                },
                "required": ["period"]
            }
        }),
        serde_json::json!({
            "name": "get_comparison",
            "description": "Compare the number of violations in the current period against the immediately preceding one (today vs yesterday, this week vs last week, and so on).",
            "parameters": {
                "type": "object",
                "properties": {
                    "period": { "type": "string", "enum": ["day", "week", "month", "year"], "description": "Symbolic period to compare" }
                },
                "required": ["period"]
            }
        }),
        serde_json::json!({
            "name": "get_all_in_range",
            "description": "Retrieve violations recorded between two dates. Use for questions like 'yesterday', 'previous week', or 'last month'. Set countOnly for a plain count, summary for an aggregated summary.",
            "parameters": {
                "type": "object",
                "properties": {
                    "from": { "type": "string", "description": "Range start in YYYY-MM-DD" },
                    "to": { "type": "string", "description": "Range end in YYYY-MM-DD" },
                    "countOnly": { "type": "boolean", "description": "Return only the record count" },
                    "summary": { "type": "boolean", "description": "Return an aggregated summary" }
                },
                "required": ["from", "to"]
            }
        }),
        serde_json::json!({
            "name": "get_histogram",
            "description": "Count violations per hour of day, day of month, month, or year across a date range. Use for 'what time of day' or seasonal-pattern questions.",
            "parameters": {
                "type": "object",
                "properties": {
                    "from": { "type": "string", "description": "Range start in YYYY-MM-DD" },
                    "to": { "type": "string", "description": "Range end in YYYY-MM-DD" },
                    "granularity": { "type": "string", "enum": ["hourly", "daily", "monthly", "yearly"], "description": "Bucket granularity" }
                },
                "required": ["from", "to", "granularity"]
            }
        }),
        serde_json::json!({
            "name": "get_total_for_year",
            "description": "Get the total number of violations recorded in the specified year.",
            "parameters": {
                "type": "object",
                "properties": {
                    "year": { "type": "integer", "description": "4-digit year" }
                },
                "required": ["year"]
            }
        }),
        serde_json::json!({
            "name": "get_by_street_name",
            "description": "Retrieve all violations recorded on the specified street. Matching is case-insensitive. Omit from/to when no range is asked for.",
            "parameters": {
                "type": "object",
                "properties": {
                    "streetName": { "type": "string", "description": "Street name" },
                    "from": { "type": "string", "description": "Optional range start in YYYY-MM-DD" },
                    "to": { "type": "string", "description": "Optional range end in YYYY-MM-DD" }
                },
                "required": ["streetName"]
            }
        }),
        serde_json::json!({
            "name": "get_by_violation_type",
            "description": "Retrieve all violations of the specified type. Only 'overtaking-from-left' and 'overtaking-from-right' exist; for anything else tell the user only these two types are recorded.",
            "parameters": {
                "type": "object",
                "properties": {
                    "violationType": { "type": "string", "enum": ["overtaking-from-left", "overtaking-from-right"], "description": "Violation type" },
                    "from": { "type": "string", "description": "Optional range start in YYYY-MM-DD" },
                    "to": { "type": "string", "description": "Optional range end in YYYY-MM-DD" }
                },
                "required": ["violationType"]
            }
        }),
        serde_json::json!({
            "name": "get_by_location",
            "description": "Retrieve all violations recorded at the specified latitude and longitude.",
            "parameters": {
                "type": "object",
                "properties": {
                    "lat": { "type": "number", "description": "Latitude" },
                    "long": { "type": "number", "description": "Longitude" }
                },
                "required": ["lat", "long"]
            }
        }),
        serde_json::json!({
            "name": "get_all_violations",
            "description": "Retrieve every recorded violation. Prefer the filtered tools when the question names a date, street, type, or location.",
            "parameters": {
                "type": "object",
                "properties": {},
                "required": []
            }
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_max_serializes_camel_case() {
        let stats = GroupedMax {
            max_count: 5,
            winners: vec!["King Fahd Road".to_string()],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["maxCount"], 5);
        assert_eq!(json["winners"][0], "King Fahd Road");
    }

    #[test]
    fn empty_summary_uses_no_data_sentinel() {
        let summary = ViolationSummary::empty();
        assert_eq!(summary.total_violations, 0);
        assert_eq!(summary.highest_violated_day.day, NO_DATA_DAY);
        assert!(summary.violations_stats.street_name.winners.is_empty());
    }

    #[test]
    fn granularity_parses_lowercase() {
        assert_eq!("hourly".parse::<Granularity>().unwrap(), Granularity::Hourly);
        assert_eq!(Granularity::Yearly.to_string(), "yearly");
        assert!("quarterly".parse::<Granularity>().is_err());
    }

    #[test]
    fn range_result_count_serializes_as_object() {
        let result = RangeQueryResult::Count { total: 4 };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({ "total": 4 })
        );
    }

    #[test]
    fn tool_definitions_cover_every_tool_name() {
        let defs = tool_definitions();
        let names: Vec<&str> = defs
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        for tool in [
            ToolName::GetSummary,
            ToolName::GetStatsForPeriod,
            ToolName::GetComparison,
            ToolName::GetAllInRange,
            ToolName::GetHistogram,
            ToolName::GetTotalForYear,
            ToolName::GetByStreetName,
            ToolName::GetByViolationType,
            ToolName::GetByLocation,
            ToolName::GetAllViolations,
        ] {
            assert!(
                names.contains(&tool.to_string().as_str()),
                "missing tool definition for {tool}"
            );
        }
    }
}
