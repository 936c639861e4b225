//! Date-sorted in-memory violation store.
//!
//! Records are held sorted by `(date, id)`, so range queries reduce to two
//! binary searches over the date-ordered slice. The store is read-only
//! after construction, which is what makes every aggregation request a
//! consistent snapshot for free.

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use violation_map_temporal::TimeWindow;
use violation_map_violation_models::{ViolationRecord, ViolationType};

use crate::{StoreError, ViolationStore};

/// One row of the detection pipeline's CSV export.
///
/// `violation_type` accepts both the kebab-case wire form and the spaced
/// spelling of older exports. `id` is optional; rows without one get a
/// generated UUID.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    date: String,
    time: String,
    license_plate_number: String,
    violation_type: String,
    vehicle_type: String,
    street_name: String,
    latitude: f64,
    longitude: f64,
}

impl CsvRow {
    fn into_record(self) -> Result<ViolationRecord, StoreError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|e| {
            StoreError::Conversion {
                message: format!(
                    "Invalid date '{}': {e}. Expected format: YYYY-MM-DD",
                    self.date
                ),
            }
        })?;

        let violation_type =
            self.violation_type
                .parse::<ViolationType>()
                .map_err(|_| StoreError::Conversion {
                    message: format!("Unknown violation type '{}'", self.violation_type),
                })?;

        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(ViolationRecord {
            id,
            date,
            time: self.time,
            license_plate_number: self.license_plate_number,
            violation_type,
            vehicle_type: self.vehicle_type,
            street_name: self.street_name,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// In-memory [`ViolationStore`] backed by a date-sorted `Vec`.
pub struct MemoryStore {
    records: Vec<ViolationRecord>,
}

impl MemoryStore {
    /// Creates a store from a record collection, sorting it by `(date, id)`.
    #[must_use]
    pub fn from_records(mut records: Vec<ViolationRecord>) -> Self {
        records.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        Self { records }
    }

    /// Creates an empty store.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Loads records from a CSV export at `path`.
    ///
    /// Malformed rows are skipped with a warning; the load summary reports
    /// how many rows were dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or read.
    pub fn from_csv_path(path: &Path) -> Result<Self, StoreError> {
        let reader = csv::Reader::from_path(path)?;
        let store = Self::from_csv_reader(reader)?;
        log::info!(
            "Loaded {} violation records from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    /// Loads records from any CSV reader.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the CSV stream cannot be read.
    pub fn from_csv_reader<R: std::io::Read>(
        mut reader: csv::Reader<R>,
    ) -> Result<Self, StoreError> {
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
            // CSV line numbers are 1-based and the header occupies line 1.
            let line = idx + 2;
            match row {
                Ok(row) => match row.into_record() {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        log::warn!("Skipping CSV line {line}: {e}");
                        skipped += 1;
                    }
                },
                Err(e) => {
                    log::warn!("Skipping CSV line {line}: {e}");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::warn!("Skipped {skipped} malformed CSV rows");
        }

        Ok(Self::from_records(records))
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The date-sorted slice of records inside `window`.
    fn range_slice(&self, window: TimeWindow) -> &[ViolationRecord] {
        let start = self.records.partition_point(|r| r.date < window.from);
        let end = self.records.partition_point(|r| r.date <= window.to);
        &self.records[start..end]
    }
}

#[async_trait]
impl ViolationStore for MemoryStore {
    async fn fetch_all(&self) -> Result<Vec<ViolationRecord>, StoreError> {
        Ok(self.records.clone())
    }

    async fn fetch_range(&self, window: TimeWindow) -> Result<Vec<ViolationRecord>, StoreError> {
        Ok(self.range_slice(window).to_vec())
    }

    async fn count_range(&self, window: TimeWindow) -> Result<u64, StoreError> {
        Ok(self.range_slice(window).len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, date_str: &str) -> ViolationRecord {
        ViolationRecord {
            id: id.to_string(),
            date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
            time: "08:30".to_string(),
            license_plate_number: "011".to_string(),
            violation_type: ViolationType::OvertakingFromRight,
            vehicle_type: "car".to_string(),
            street_name: "King Fahd Road".to_string(),
            latitude: 24.7,
            longitude: 46.6,
        }
    }

    #[tokio::test]
    async fn fetch_range_is_inclusive_at_both_ends() {
        let store = MemoryStore::from_records(vec![
            record("a", "2024-09-01"),
            record("b", "2024-09-15"),
            record("c", "2024-09-30"),
            record("d", "2024-10-01"),
        ]);

        let window = TimeWindow::new(date(2024, 9, 1), date(2024, 9, 30));
        let rows = store.fetch_range(window).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        assert_eq!(store.count_range(window).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn empty_range_is_a_value_not_an_error() {
        let store = MemoryStore::from_records(vec![record("a", "2024-09-01")]);
        let window = TimeWindow::new(date(2023, 1, 1), date(2023, 12, 31));
        assert!(store.fetch_range(window).await.unwrap().is_empty());
        assert_eq!(store.count_range(window).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn records_are_sorted_by_date() {
        let store = MemoryStore::from_records(vec![
            record("late", "2024-12-01"),
            record("early", "2024-01-01"),
        ]);
        let all = store.fetch_all().await.unwrap();
        assert_eq!(all[0].id, "early");
        assert_eq!(all[1].id, "late");
    }

    #[test]
    fn csv_loading_skips_malformed_rows() {
        let csv_data = "\
date,time,license_plate_number,violation_type,vehicle_type,street_name,latitude,longitude
2024-09-12,16:45,011,overtaking from right,car,King Fahd Road,24.72515,46.634721
not-a-date,16:10,012,overtaking from left,car,Olaya Street,24.76268,46.710619
2024-09-18,16:10,013,overtaking-from-left,truck,Olaya Street,24.76268,46.710619
";
        let reader = csv::Reader::from_reader(csv_data.as_bytes());
        let store = MemoryStore::from_csv_reader(reader).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.records[0].violation_type,
            ViolationType::OvertakingFromRight
        );
        assert_eq!(
            store.records[1].violation_type,
            ViolationType::OvertakingFromLeft
        );
        // Rows without an id column get a generated one.
        assert!(!store.records[0].id.is_empty());
    }

    #[test]
    fn csv_loading_keeps_explicit_ids() {
        let csv_data = "\
id,date,time,license_plate_number,violation_type,vehicle_type,street_name,latitude,longitude
v-7,2024-09-12,16:45,011,overtaking-from-right,car,King Fahd Road,24.72515,46.634721
";
        let reader = csv::Reader::from_reader(csv_data.as_bytes());
        let store = MemoryStore::from_csv_reader(reader).unwrap();
        assert_eq!(store.records[0].id, "v-7");
    }
}
