//! Coordinate -> record lookup.
//!
//! The index tracks the identity of the record list it was built from and
//! rebuilds whole when handed a different list. It never diffs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::GridCoordinate;
use crate::records::PalletRecord;

/// Shared, wholesale-replaced record list.
pub type RecordList = Arc<Vec<PalletRecord>>;

#[derive(Debug, Default)]
pub struct GridIndex {
    source: Option<RecordList>,
    entries: HashMap<GridCoordinate, usize>,
}

impl GridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(records: &RecordList) -> Self {
        let mut index = Self::new();
        index.rebuild(records);
        index
    }

    fn rebuild(&mut self, records: &RecordList) {
        self.entries.clear();
        self.entries.reserve(records.len());
        for (i, record) in records.iter().enumerate() {
            // Later records win, matching a plain map insert.
            self.entries.insert(record.grid_coordinate, i);
        }
        self.source = Some(Arc::clone(records));
    }

    /// Rebuilds if `records` is not the list this index was built from.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, records: &RecordList) -> bool {
        let current = self
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, records));
        if !current {
            self.rebuild(records);
        }
        !current
    }

    pub fn get(&self, coord: GridCoordinate) -> Option<&PalletRecord> {
        let source = self.source.as_ref()?;
        self.entries.get(&coord).and_then(|&i| source.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.source = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: u32, y: u32, z: u32, content: &str) -> PalletRecord {
        PalletRecord {
            content: content.to_string(),
            present: true,
            ..PalletRecord::empty(GridCoordinate::new(x, y, z))
        }
    }

    #[test]
    fn test_lookup_by_coordinate() {
        let records: RecordList = Arc::new(vec![
            record(0, 0, 0, "a"),
            record(1, 12, 0, "b"),
            record(11, 2, 0, "c"),
        ]);
        let index = GridIndex::build(&records);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(GridCoordinate::new(1, 12, 0)).unwrap().content, "b");
        assert_eq!(index.get(GridCoordinate::new(11, 2, 0)).unwrap().content, "c");
        assert!(index.get(GridCoordinate::new(5, 5, 5)).is_none());
    }

    #[test]
    fn test_sync_rebuilds_only_on_new_list() {
        let first: RecordList = Arc::new(vec![record(0, 0, 0, "a")]);
        let mut index = GridIndex::new();
        assert!(index.sync(&first));
        assert!(!index.sync(&Arc::clone(&first)));

        let second: RecordList = Arc::new(vec![record(0, 0, 0, "z")]);
        assert!(index.sync(&second));
        assert_eq!(index.get(GridCoordinate::ORIGIN).unwrap().content, "z");
    }

    #[test]
    fn test_duplicate_coordinates_keep_last() {
        let records: RecordList = Arc::new(vec![record(0, 0, 0, "old"), record(0, 0, 0, "new")]);
        let index = GridIndex::build(&records);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(GridCoordinate::ORIGIN).unwrap().content, "new");
    }
}
