//! In-memory record store.
//!
//! The store owns every record of the session in submission order. It only
//! grows during a session; clearing it is a reset, handled by the app.

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};

/// Ordered, append-only collection of records.
///
/// Serializes as a plain JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return a reference to it.
    pub fn push(&mut self, record: Record) -> &Record {
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Find a record by id.
    ///
    /// Linear scan; returns the first match if ids ever collide.
    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// All records in submission order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in submission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Coordinates;
    use chrono::{TimeZone, Utc};

    fn record_at(millis: i64, note: &str) -> Record {
        Record::new_at(
            Utc.timestamp_millis_opt(millis).unwrap(),
            Coordinates::new(45.0, 15.0),
            3.0,
            20.0,
            5.0,
            note.to_string(),
        )
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut store = RecordStore::new();
        store.push(record_at(1_700_000_000_001, "first"));
        store.push(record_at(1_700_000_000_002, "second"));

        let notes: Vec<&str> = store.iter().map(Record::material_damage).collect();
        assert_eq!(notes, vec!["first", "second"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_push_returns_appended_record() {
        let mut store = RecordStore::new();
        let pushed = store.push(record_at(1_700_000_000_001, "only")).clone();
        assert_eq!(store.records()[0], pushed);
    }

    #[test]
    fn test_find_by_id() {
        let mut store = RecordStore::new();
        store.push(record_at(1_700_000_000_001, "first"));
        let wanted = store.push(record_at(1_700_000_000_002, "second")).id().clone();

        let found = store.find(&wanted).unwrap();
        assert_eq!(found.material_damage(), "second");
    }

    #[test]
    fn test_find_unknown_id() {
        let mut store = RecordStore::new();
        store.push(record_at(1_700_000_000_001, "first"));

        assert!(store.find(&RecordId::from("9999999999")).is_none());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut store = RecordStore::new();
        store.push(record_at(1_700_000_000_001, "first"));

        let value = serde_json::to_value(&store).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 1);
    }
}
