#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Traffic violation record types and the violation taxonomy.
//!
//! This crate defines the canonical violation record shape used across the
//! entire violation-map system. Detected violations arrive from an external
//! detection pipeline; everything downstream (store, aggregation engine,
//! API) consumes these types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The closed set of violation types the detection pipeline emits.
///
/// The wire form is kebab-case. Parsing also accepts the spaced spelling
/// used by older exports (`"overtaking from left"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationType {
    /// Overtaking another vehicle from the left lane.
    #[strum(to_string = "overtaking-from-left", serialize = "overtaking from left")]
    OvertakingFromLeft,
    /// Overtaking another vehicle from the right lane.
    #[strum(
        to_string = "overtaking-from-right",
        serialize = "overtaking from right"
    )]
    OvertakingFromRight,
}

impl ViolationType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::OvertakingFromLeft, Self::OvertakingFromRight]
    }
}

/// A single detected traffic violation.
///
/// `date` carries calendar-day precision only; `time` is the local
/// wall-clock `HH:MM` string and is used solely for hour-of-day bucketing.
/// `NaiveDate` ordering coincides with the chronological ordering of
/// `YYYY-MM-DD` strings, which every range filter in the system relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// Calendar date the violation occurred on.
    pub date: NaiveDate,
    /// Local wall-clock time as `HH:MM`.
    pub time: String,
    /// License plate of the offending vehicle.
    pub license_plate_number: String,
    /// Detected violation type.
    pub violation_type: ViolationType,
    /// Vehicle type (open set: `car`, `truck`, `bus`, ...).
    pub vehicle_type: String,
    /// Street the violation was detected on. Matched case-insensitively;
    /// original casing is preserved for display.
    pub street_name: String,
    /// Detection latitude.
    pub latitude: f64,
    /// Detection longitude.
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_type_kebab_roundtrip() {
        for vt in ViolationType::all() {
            let s = vt.to_string();
            assert_eq!(s.parse::<ViolationType>().unwrap(), *vt);
        }
    }

    #[test]
    fn violation_type_parses_spaced_spelling() {
        assert_eq!(
            "overtaking from left".parse::<ViolationType>().unwrap(),
            ViolationType::OvertakingFromLeft
        );
        assert_eq!(
            "overtaking from right".parse::<ViolationType>().unwrap(),
            ViolationType::OvertakingFromRight
        );
    }

    #[test]
    fn violation_type_rejects_unknown() {
        assert!("tailgating".parse::<ViolationType>().is_err());
    }

    #[test]
    fn violation_type_as_ref_is_kebab() {
        assert_eq!(
            ViolationType::OvertakingFromRight.as_ref(),
            "overtaking-from-right"
        );
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = ViolationRecord {
            id: "v-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 12).unwrap(),
            time: "16:45".to_string(),
            license_plate_number: "011".to_string(),
            violation_type: ViolationType::OvertakingFromRight,
            vehicle_type: "car".to_string(),
            street_name: "King Fahd Road".to_string(),
            latitude: 24.725_15,
            longitude: 46.634_721,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["licensePlateNumber"], "011");
        assert_eq!(json["violationType"], "overtaking-from-right");
        assert_eq!(json["date"], "2024-09-12");
    }
}
