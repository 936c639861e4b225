#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Calendar window resolution for the statistics engine.
//!
//! Every piece of date arithmetic in the system lives here: resolving a
//! symbolic period (day/week/month/year) into concrete `[from, to]` calendar
//! windows, computing the preceding window for period-over-period
//! comparisons, and the one-day client-date correction for browser-supplied
//! ranges. Nothing outside this crate is allowed to do its own date math.
//!
//! Business weeks run Saturday through Friday. The "current" window of any
//! period is rolling: it always ends at the reference date, never in the
//! future. The "previous" window is a fixed block (a full day, a full
//! Saturday-to-Friday week, a full calendar month or year) sitting flush
//! against the current window's start.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A symbolic statistics period, resolved against a reference date.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    /// A single calendar day.
    Day,
    /// A Saturday-to-Friday business week.
    Week,
    /// A calendar month.
    Month,
    /// A calendar year.
    Year,
}

impl Period {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Day, Self::Week, Self::Month, Self::Year]
    }
}

/// A closed calendar-date range used to filter violation records.
///
/// Both ends are inclusive and `from <= to` for every window produced by
/// this crate. Windows are request-scoped values; they are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    /// First day of the window (inclusive).
    pub from: NaiveDate,
    /// Last day of the window (inclusive).
    pub to: NaiveDate,
}

impl TimeWindow {
    /// Creates a window spanning `[from, to]`.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Creates a single-day window.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }

    /// Returns whether `date` falls inside the window (inclusive ends).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// The Saturday starting the business week that contains `date`.
///
/// A date that is itself a Saturday starts its own week.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Sat).first_day()
}

/// First day of `date`'s calendar month.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or_default()
}

/// Last day of `date`'s calendar month.
#[must_use]
pub fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date) + Months::new(1) - Days::new(1)
}

/// January 1 of `date`'s year.
#[must_use]
pub fn year_start(date: NaiveDate) -> NaiveDate {
    month_start(date).with_month(1).unwrap_or_default()
}

/// December 31 of `date`'s year.
#[must_use]
pub fn year_end(date: NaiveDate) -> NaiveDate {
    year_start(date) + Months::new(12) - Days::new(1)
}

/// Resolves the rolling "current" window for `period` as of `today`.
///
/// The window starts at the period boundary (today, the week's Saturday,
/// the first of the month, January 1) and always ends at `today` itself:
/// "current week" means Saturday through today, not Saturday through
/// Friday.
#[must_use]
pub fn current_window(period: Period, today: NaiveDate) -> TimeWindow {
    let from = match period {
        Period::Day => today,
        Period::Week => week_start(today),
        Period::Month => month_start(today),
        Period::Year => year_start(today),
    };
    TimeWindow::new(from, today)
}

/// Resolves the full fixed block of `period` containing `reference`.
///
/// Unlike [`current_window`], the result extends to the period's natural
/// end (Friday, the last of the month, December 31) even when that lies in
/// the future of `reference`.
#[must_use]
pub fn bounded_window(period: Period, reference: NaiveDate) -> TimeWindow {
    match period {
        Period::Day => TimeWindow::single_day(reference),
        Period::Week => {
            let from = week_start(reference);
            TimeWindow::new(from, from + Days::new(6))
        }
        Period::Month => TimeWindow::new(month_start(reference), month_end(reference)),
        Period::Year => TimeWindow::new(year_start(reference), year_end(reference)),
    }
}

/// Resolves the fixed block immediately preceding the current window of
/// `period`, with no gap and no overlap: `previous.to` is always the day
/// before `current_window(period, today).from`.
///
/// Year and month boundaries roll over correctly (the previous month of
/// any January date is December of the prior year), and short months need
/// no clamping because the block is derived from the current window's
/// start rather than by shifting `today` itself.
#[must_use]
pub fn previous_window(period: Period, today: NaiveDate) -> TimeWindow {
    let to = current_window(period, today).from - Days::new(1);
    let from = match period {
        Period::Day => to,
        Period::Week => to - Days::new(6),
        Period::Month => month_start(to),
        Period::Year => year_start(to),
    };
    TimeWindow::new(from, to)
}

/// Applies the client-date correction: shifts both window bounds forward
/// by exactly one day.
///
/// Browser-originated date ranges are serialized from local midnight and
/// truncated through UTC, which lands them one day early by the time they
/// reach the server. Callers apply this transform at most once per request
/// path, and only to windows whose dates were marked as coming from a
/// browser.
#[must_use]
pub fn correct_client_window(window: TimeWindow) -> TimeWindow {
    TimeWindow::new(window.from + Days::new(1), window.to + Days::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn current_week_starts_on_saturday() {
        // 2024-09-12 is a Thursday; the week's Saturday is 2024-09-07.
        let window = current_window(Period::Week, date(2024, 9, 12));
        assert_eq!(window.from, date(2024, 9, 7));
        assert_eq!(window.from.weekday(), Weekday::Sat);
        assert_eq!(window.to, date(2024, 9, 12));
    }

    #[test]
    fn saturday_starts_its_own_week() {
        let window = current_window(Period::Week, date(2024, 9, 14));
        assert_eq!(window.from, date(2024, 9, 14));
        assert_eq!(window.to, date(2024, 9, 14));
    }

    #[test]
    fn current_window_never_extends_past_today() {
        let today = date(2024, 9, 12);
        for period in Period::all() {
            let window = current_window(*period, today);
            assert!(window.from <= today, "{period}: from after today");
            assert_eq!(window.to, today, "{period}: to must be today");
        }
    }

    #[test]
    fn bounded_week_is_saturday_to_friday() {
        let window = bounded_window(Period::Week, date(2024, 9, 12));
        assert_eq!(window.from, date(2024, 9, 7));
        assert_eq!(window.to, date(2024, 9, 13));
        assert_eq!(window.to.weekday(), Weekday::Fri);
    }

    #[test]
    fn bounded_month_covers_whole_month() {
        let window = bounded_window(Period::Month, date(2024, 2, 15));
        assert_eq!(window.from, date(2024, 2, 1));
        assert_eq!(window.to, date(2024, 2, 29));
    }

    #[test]
    fn bounded_year_covers_whole_year() {
        let window = bounded_window(Period::Year, date(2023, 6, 1));
        assert_eq!(window.from, date(2023, 1, 1));
        assert_eq!(window.to, date(2023, 12, 31));
    }

    #[test]
    fn previous_window_sits_flush_against_current() {
        // No gap, no overlap, for every period and across boundaries.
        let samples = [
            date(2024, 9, 12),
            date(2024, 1, 1),
            date(2024, 3, 31),
            date(2024, 12, 31),
            date(2025, 1, 4), // a Saturday
            date(2024, 2, 29),
        ];
        for today in samples {
            for period in Period::all() {
                let current = current_window(*period, today);
                let previous = previous_window(*period, today);
                assert_eq!(
                    previous.to + Days::new(1),
                    current.from,
                    "{period} @ {today}: previous window not flush"
                );
                assert!(previous.from <= previous.to);
            }
        }
    }

    #[test]
    fn previous_week_is_full_saturday_to_friday_block() {
        let previous = previous_window(Period::Week, date(2024, 9, 12));
        assert_eq!(previous.from, date(2024, 8, 31));
        assert_eq!(previous.to, date(2024, 9, 6));
        assert_eq!(previous.from.weekday(), Weekday::Sat);
        assert_eq!(previous.to.weekday(), Weekday::Fri);
    }

    #[test]
    fn previous_month_rolls_over_year_boundary() {
        let previous = previous_window(Period::Month, date(2025, 1, 15));
        assert_eq!(previous.from, date(2024, 12, 1));
        assert_eq!(previous.to, date(2024, 12, 31));
    }

    #[test]
    fn previous_month_from_march_31_is_all_of_february() {
        let previous = previous_window(Period::Month, date(2024, 3, 31));
        assert_eq!(previous.from, date(2024, 2, 1));
        assert_eq!(previous.to, date(2024, 2, 29));
    }

    #[test]
    fn previous_day_from_january_first_is_december_31() {
        let previous = previous_window(Period::Day, date(2025, 1, 1));
        assert_eq!(previous.from, date(2024, 12, 31));
        assert_eq!(previous.to, date(2024, 12, 31));
    }

    #[test]
    fn previous_year_is_full_prior_year() {
        let previous = previous_window(Period::Year, date(2024, 7, 20));
        assert_eq!(previous.from, date(2023, 1, 1));
        assert_eq!(previous.to, date(2023, 12, 31));
    }

    #[test]
    fn client_correction_shifts_forward_one_day() {
        let window = TimeWindow::new(date(2024, 9, 1), date(2024, 9, 30));
        let corrected = correct_client_window(window);
        assert_eq!(corrected.from, date(2024, 9, 2));
        assert_eq!(corrected.to, date(2024, 10, 1));
    }

    #[test]
    fn client_correction_crosses_month_and_year_boundaries() {
        let corrected = correct_client_window(TimeWindow::single_day(date(2024, 12, 31)));
        assert_eq!(corrected.from, date(2025, 1, 1));
        assert_eq!(corrected.to, date(2025, 1, 1));
    }

    #[test]
    fn window_contains_is_inclusive_at_both_ends() {
        let window = TimeWindow::new(date(2024, 9, 1), date(2024, 9, 30));
        assert!(window.contains(date(2024, 9, 1)));
        assert!(window.contains(date(2024, 9, 30)));
        assert!(!window.contains(date(2024, 8, 31)));
        assert!(!window.contains(date(2024, 10, 1)));
    }

    #[test]
    fn period_parses_lowercase_names() {
        assert_eq!("week".parse::<Period>().unwrap(), Period::Week);
        assert_eq!(Period::Month.to_string(), "month");
        assert!("fortnight".parse::<Period>().is_err());
    }
}
