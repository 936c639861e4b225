//! Query operations for the AI agent and the dashboard data hooks.
//!
//! Each function implements one externally invokable operation. They read
//! a consistent snapshot from the [`ViolationStore`], run the pure
//! aggregation cores, and return typed results. All window arithmetic is
//! delegated to `violation_map_temporal`; the one-day client-date
//! correction is applied in exactly one place ([`client_corrected`]).

use chrono::{Datelike, NaiveDate};
use violation_map_analytics_models::{
    ComparisonResult, HistogramParams, HistogramResult, LocationQuery, PeriodStats, RangeParams,
    RangeQueryResult, StreetQuery, SummaryParams, ViolationSummary, ViolationTypeQuery,
    ViolationsStats, YearTotal,
};
use violation_map_store::ViolationStore;
use violation_map_temporal::{self as temporal, Period, TimeWindow};
use violation_map_violation_models::{ViolationRecord, ViolationType};

use crate::{AnalyticsError, EngineConfig};

/// Validates an explicit `[from, to]` range.
fn validated_range(from: NaiveDate, to: NaiveDate) -> Result<TimeWindow, AnalyticsError> {
    if from > to {
        return Err(AnalyticsError::Validation {
            field: "from",
            message: format!("range start {from} is after range end {to}"),
        });
    }
    Ok(TimeWindow::new(from, to))
}

/// The single application point of the client-date correction.
///
/// Browser-originated windows are shifted forward one day when the engine
/// runs with client skew enabled; server-normalized windows pass through
/// untouched. Callers must not pre-shift dates.
fn client_corrected(config: &EngineConfig, date_from_frontend: bool, window: TimeWindow) -> TimeWindow {
    if date_from_frontend && config.client_skew_enabled {
        temporal::correct_client_window(window)
    } else {
        window
    }
}

fn exact_day(year: i32, month: u32, day: u32) -> Result<TimeWindow, AnalyticsError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(TimeWindow::single_day)
        .ok_or_else(|| AnalyticsError::Validation {
            field: "day",
            message: format!("{year:04}-{month:02}-{day:02} is not a valid calendar date"),
        })
}

fn exact_month(year: i32, month: u32) -> Result<TimeWindow, AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        AnalyticsError::Validation {
            field: "month",
            message: format!("{year:04}-{month:02} is not a valid month"),
        }
    })?;
    Ok(temporal::bounded_window(Period::Month, first))
}

fn exact_year(year: i32) -> Result<TimeWindow, AnalyticsError> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| AnalyticsError::Validation {
        field: "year",
        message: format!("{year} is not a valid year"),
    })?;
    Ok(temporal::bounded_window(Period::Year, first))
}

fn validate_date_parts(params: &SummaryParams) -> Result<(), AnalyticsError> {
    if let Some(year) = params.year
        && !(1000..=9999).contains(&year)
    {
        return Err(AnalyticsError::Validation {
            field: "year",
            message: format!("expected a 4-digit year, got {year}"),
        });
    }
    if let Some(month) = params.month
        && !(1..=12).contains(&month)
    {
        return Err(AnalyticsError::Validation {
            field: "month",
            message: format!("expected a month in 1-12, got {month}"),
        });
    }
    if let Some(day) = params.day
        && !(1..=31).contains(&day)
    {
        return Err(AnalyticsError::Validation {
            field: "day",
            message: format!("expected a day in 1-31, got {day}"),
        });
    }
    Ok(())
}

/// Resolves the effective summary window from explicit date parts and/or a
/// symbolic period, as of `today`.
///
/// Precedence, first match wins: year+month+day; year+day (that day of the
/// current month); year+month; month+day (current year); day (current
/// month and year); month (current year); year; symbolic period; nothing
/// (current year-to-date).
///
/// # Errors
///
/// Returns [`AnalyticsError::Validation`] naming the offending field for
/// out-of-range parts or combinations that name no real calendar date.
/// Inputs are never silently clamped.
pub fn resolve_summary_window(
    params: &SummaryParams,
    today: NaiveDate,
) -> Result<TimeWindow, AnalyticsError> {
    validate_date_parts(params)?;

    match (params.year, params.month, params.day) {
        (Some(year), Some(month), Some(day)) => exact_day(year, month, day),
        (Some(year), None, Some(day)) => exact_day(year, today.month(), day),
        (Some(year), Some(month), None) => exact_month(year, month),
        (None, Some(month), Some(day)) => exact_day(today.year(), month, day),
        (None, None, Some(day)) => exact_day(today.year(), today.month(), day),
        (None, Some(month), None) => exact_month(today.year(), month),
        (Some(year), None, None) => exact_year(year),
        (None, None, None) => Ok(temporal::current_window(
            params.period.unwrap_or(Period::Year),
            today,
        )),
    }
}

/// Computes the violation summary for a date or period.
///
/// A window with no records short-circuits to the zero summary (sentinel
/// busiest day, empty winners) instead of failing.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the inputs fail validation or the store
/// query fails.
pub async fn get_summary(
    store: &dyn ViolationStore,
    config: &EngineConfig,
    params: &SummaryParams,
) -> Result<ViolationSummary, AnalyticsError> {
    let today = chrono::Local::now().date_naive();
    let window = resolve_summary_window(params, today)?;
    let window = client_corrected(config, params.date_from_frontend, window);

    let records = store.fetch_range(window).await?;
    Ok(crate::aggregate::summarize(&records))
}

/// Computes the per-dimension grouped maxima for the rolling current
/// window of `period`.
///
/// The three dimensions are aggregated from one snapshot fetch, so they
/// can never reflect different states of the store.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the store query fails.
pub async fn get_stats_for_period(
    store: &dyn ViolationStore,
    period: Period,
) -> Result<PeriodStats, AnalyticsError> {
    let today = chrono::Local::now().date_naive();
    let window = temporal::current_window(period, today);

    let records = store.fetch_range(window).await?;
    let stats = ViolationsStats {
        street_name: crate::aggregate::max_group(&records, |r| r.street_name.as_str()),
        vehicle_type: crate::aggregate::max_group(&records, |r| r.vehicle_type.as_str()),
        violation_type: crate::aggregate::max_group(&records, |r| r.violation_type.as_ref()),
    };

    Ok(PeriodStats {
        period,
        window,
        stats,
    })
}

/// Compares the current rolling window of `period` against the fixed
/// preceding window.
///
/// The two counts are issued concurrently and awaited jointly; a failure
/// of either fails the whole comparison.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if either store query fails.
pub async fn get_comparison(
    store: &dyn ViolationStore,
    period: Period,
) -> Result<ComparisonResult, AnalyticsError> {
    let today = chrono::Local::now().date_naive();
    let current_window = temporal::current_window(period, today);
    let previous_window = temporal::previous_window(period, today);

    let (current, previous) = futures::try_join!(
        store.count_range(current_window),
        store.count_range(previous_window)
    )?;

    let diff = crate::aggregate::percent_diff(current, previous);

    Ok(ComparisonResult {
        period,
        current_window,
        previous_window,
        current,
        previous,
        diff,
        description: format!(
            "Violations this {period} ({} to {}): {current}; previous {period} ({} to {}): {previous}",
            current_window.from, current_window.to, previous_window.from, previous_window.to,
        ),
    })
}

/// Retrieves records, a count, or a summary for an explicit range.
///
/// `count_only` wins over `summary`, which wins over the full record list.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the range is inverted or the store query
/// fails.
pub async fn get_all_in_range(
    store: &dyn ViolationStore,
    config: &EngineConfig,
    params: &RangeParams,
) -> Result<RangeQueryResult, AnalyticsError> {
    let window = client_corrected(
        config,
        params.date_from_frontend,
        validated_range(params.from, params.to)?,
    );

    if params.count_only {
        let total = store.count_range(window).await?;
        return Ok(RangeQueryResult::Count { total });
    }

    let records = store.fetch_range(window).await?;
    if params.summary {
        return Ok(RangeQueryResult::Summary(crate::aggregate::summarize(
            &records,
        )));
    }

    Ok(RangeQueryResult::Records(records))
}

/// Buckets a range's records by the requested granularity.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the range is inverted or the store query
/// fails.
pub async fn get_histogram(
    store: &dyn ViolationStore,
    config: &EngineConfig,
    params: &HistogramParams,
) -> Result<HistogramResult, AnalyticsError> {
    let window = client_corrected(
        config,
        params.date_from_frontend,
        validated_range(params.from, params.to)?,
    );

    let records = store.fetch_range(window).await?;
    Ok(HistogramResult {
        granularity: params.granularity,
        window,
        buckets: crate::aggregate::histogram(&records, params.granularity),
    })
}

/// Counts the violations recorded in `year`.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the year fails validation or the store
/// query fails.
pub async fn get_total_for_year(
    store: &dyn ViolationStore,
    year: i32,
) -> Result<YearTotal, AnalyticsError> {
    if !(1000..=9999).contains(&year) {
        return Err(AnalyticsError::Validation {
            field: "year",
            message: format!("expected a 4-digit year, got {year}"),
        });
    }

    let window = exact_year(year)?;
    let total = store.count_range(window).await?;
    Ok(YearTotal { year, total })
}

async fn fetch_filtered<P>(
    store: &dyn ViolationStore,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    predicate: P,
) -> Result<Vec<ViolationRecord>, AnalyticsError>
where
    P: Fn(&ViolationRecord) -> bool,
{
    if let (Some(from), Some(to)) = (from, to) {
        validated_range(from, to)?;
    }

    let records = store.fetch_all().await?;
    Ok(records
        .into_iter()
        .filter(|r| from.is_none_or(|f| r.date >= f))
        .filter(|r| to.is_none_or(|t| r.date <= t))
        .filter(predicate)
        .collect())
}

/// Retrieves the records on a street, matched case-insensitively, with an
/// optional date range.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the range is inverted or the store query
/// fails.
pub async fn get_by_street_name(
    store: &dyn ViolationStore,
    params: &StreetQuery,
) -> Result<Vec<ViolationRecord>, AnalyticsError> {
    let needle = params.street_name.to_lowercase();
    fetch_filtered(store, params.from, params.to, |r| {
        r.street_name.to_lowercase() == needle
    })
    .await
}

/// Retrieves the records of a violation type, with an optional date range.
///
/// # Errors
///
/// Returns [`AnalyticsError::Validation`] for a type outside the recorded
/// set, or [`AnalyticsError::Store`] if the store query fails.
pub async fn get_by_violation_type(
    store: &dyn ViolationStore,
    params: &ViolationTypeQuery,
) -> Result<Vec<ViolationRecord>, AnalyticsError> {
    let violation_type = params.violation_type.parse::<ViolationType>().map_err(|_| {
        AnalyticsError::Validation {
            field: "violationType",
            message: format!(
                "unsupported violation type '{}': only 'overtaking-from-left' and 'overtaking-from-right' are recorded",
                params.violation_type
            ),
        }
    })?;

    fetch_filtered(store, params.from, params.to, |r| {
        r.violation_type == violation_type
    })
    .await
}

/// Retrieves the records at an exact coordinate.
///
/// Coordinates are matched exactly: callers echo back stored values, they
/// never supply free-form positions.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the store query fails.
#[allow(clippy::float_cmp)]
pub async fn get_by_location(
    store: &dyn ViolationStore,
    params: &LocationQuery,
) -> Result<Vec<ViolationRecord>, AnalyticsError> {
    fetch_filtered(store, None, None, |r| {
        r.latitude == params.latitude && r.longitude == params.longitude
    })
    .await
}

/// Retrieves every recorded violation.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the store query fails.
pub async fn get_all(store: &dyn ViolationStore) -> Result<Vec<ViolationRecord>, AnalyticsError> {
    Ok(store.fetch_all().await?)
}
