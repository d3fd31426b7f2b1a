//! Run-wide record accumulator

use crate::model::Record;
use std::collections::HashSet;

/// Ordered record set keyed by identifier
///
/// The first record seen for an identifier is kept; later ones are rejected.
#[derive(Debug, Default)]
pub struct RecordSet {
    seen: HashSet<String>,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a record with this identifier was already accepted
    pub fn contains(&self, identifier: &str) -> bool {
        self.seen.contains(identifier)
    }

    /// Adds a record unless its identifier is already present
    ///
    /// Returns true if the record was added.
    pub fn insert(&mut self, record: Record) -> bool {
        if !self.seen.insert(record.identifier().to_string()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the records in insertion order
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
