//! Pure aggregation cores.
//!
//! Everything here operates on an already-filtered, immutable record slice
//! and performs no I/O, so the three statistics dimensions can never
//! observe different snapshots of the data.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use violation_map_analytics_models::{
    Granularity, GroupedMax, HighestDay, IntervalBucket, ViolationSummary, ViolationsStats,
};
use violation_map_violation_models::ViolationRecord;

/// Counts records per key and returns the maximum count together with
/// every key that reaches it.
///
/// Keys are grouped case-insensitively; the first-seen original casing is
/// kept as the display representative. Winners come out ordered by their
/// folded key, so tied leaders render in a stable order. An empty slice
/// yields `{max_count: 0, winners: []}`.
pub fn max_group<'a, F>(records: &'a [ViolationRecord], key_fn: F) -> GroupedMax
where
    F: Fn(&'a ViolationRecord) -> &'a str,
{
    let mut groups: BTreeMap<String, (String, u64)> = BTreeMap::new();

    for record in records {
        let display = key_fn(record);
        let entry = groups
            .entry(display.to_lowercase())
            .or_insert_with(|| (display.to_string(), 0));
        entry.1 += 1;
    }

    let max_count = groups.values().map(|(_, count)| *count).max().unwrap_or(0);
    if max_count == 0 {
        return GroupedMax::empty();
    }

    let winners = groups
        .into_values()
        .filter(|(_, count)| *count == max_count)
        .map(|(display, _)| display)
        .collect();

    GroupedMax { max_count, winners }
}

/// Extracts the hour (0-23) from an `HH:MM` wall-clock string.
///
/// `"08"` and `"8"` parse to the same hour.
#[must_use]
pub fn parse_hour(time: &str) -> Option<u32> {
    let (hour, _) = time.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    (hour <= 23).then_some(hour)
}

fn bucket_value(record: &ViolationRecord, granularity: Granularity) -> Option<u32> {
    match granularity {
        Granularity::Hourly => parse_hour(&record.time),
        Granularity::Daily => Some(record.date.day()),
        Granularity::Monthly => Some(record.date.month()),
        Granularity::Yearly => u32::try_from(record.date.year()).ok(),
    }
}

/// Formats a numeric bucket value into its canonical label: unpadded hours,
/// two-digit days and months, four-digit years.
#[must_use]
pub fn format_bucket_key(value: u32, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hourly => value.to_string(),
        Granularity::Daily | Granularity::Monthly => format!("{value:02}"),
        Granularity::Yearly => format!("{value:04}"),
    }
}

/// Buckets records by `granularity` and returns the non-empty buckets in
/// ascending bucket order.
///
/// Buckets are ordered by their numeric value before labels are attached,
/// so label padding is cosmetic only. Records whose time field cannot be
/// parsed are skipped from hourly histograms with a warning.
pub fn histogram(records: &[ViolationRecord], granularity: Granularity) -> Vec<IntervalBucket> {
    let mut buckets: BTreeMap<u32, u64> = BTreeMap::new();

    for record in records {
        let Some(value) = bucket_value(record, granularity) else {
            log::warn!(
                "Skipping record {} with malformed time '{}'",
                record.id,
                record.time
            );
            continue;
        };
        *buckets.entry(value).or_insert(0) += 1;
    }

    buckets
        .into_iter()
        .map(|(value, count)| IntervalBucket {
            bucket_key: format_bucket_key(value, granularity),
            count,
        })
        .collect()
}

/// The single date with the most records. Ties keep the earliest date,
/// deliberately narrower than the all-winners dimension groupings.
fn highest_violated_day(records: &[ViolationRecord]) -> HighestDay {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for record in records {
        *by_date.entry(record.date).or_insert(0) += 1;
    }

    let mut best: Option<(NaiveDate, u64)> = None;
    for (date, count) in by_date {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((date, count));
        }
    }

    best.map_or_else(HighestDay::no_data, |(date, count)| HighestDay {
        day: date.format("%Y-%m-%d").to_string(),
        count,
    })
}

/// Computes the full summary of a window's records.
///
/// An empty slice short-circuits to the zero summary without running any
/// grouped aggregation.
#[must_use]
pub fn summarize(records: &[ViolationRecord]) -> ViolationSummary {
    if records.is_empty() {
        return ViolationSummary::empty();
    }

    ViolationSummary {
        total_violations: records.len() as u64,
        highest_violated_day: highest_violated_day(records),
        violations_stats: ViolationsStats {
            street_name: max_group(records, |r| r.street_name.as_str()),
            vehicle_type: max_group(records, |r| r.vehicle_type.as_str()),
            violation_type: max_group(records, |r| r.violation_type.as_ref()),
        },
    }
}

/// Percentage difference between a current and a previous count.
///
/// `None` when both are zero, `100` when only the previous count is zero,
/// otherwise `(current - previous) / previous * 100`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_diff(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        if current == 0 {
            None
        } else {
            Some(100.0)
        }
    } else {
        Some((current as f64 - previous as f64) / previous as f64 * 100.0)
    }
}
