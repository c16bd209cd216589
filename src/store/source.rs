//! External record sources.
//!
//! Fetching is the only asynchronous step in the engine; a source hands back
//! the raw records once and the store takes it from there.

use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};

use crate::error::DataUnavailableError;
use crate::location::{parse_records, RawRecord};

pub trait WarehouseSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<RawRecord>, DataUnavailableError>>;

    /// Short label for log output.
    fn describe(&self) -> String {
        String::from("warehouse source")
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self, DataUnavailableError> {
        Ok(Self::new(parse_records(json)?))
    }
}

impl WarehouseSource for StaticSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<RawRecord>, DataUnavailableError>> {
        let records = self.records.clone();
        async move { Ok::<_, DataUnavailableError>(records) }.boxed()
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// A JSON array of raw records on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WarehouseSource for JsonFileSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<RawRecord>, DataUnavailableError>> {
        async move {
            let text = std::fs::read_to_string(&self.path)?;
            parse_records(&text)
        }
        .boxed()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A source that always fails, for exercising the retry path.
#[derive(Debug, Clone)]
pub struct FailingSource {
    reason: String,
}

impl FailingSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl WarehouseSource for FailingSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<RawRecord>, DataUnavailableError>> {
        let reason = self.reason.clone();
        async move { Err::<Vec<RawRecord>, _>(DataUnavailableError::Fetch(reason)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source_returns_its_records() {
        let source = StaticSource::from_json(r#"[{"locationCode": "I-1-1"}]"#).unwrap();
        let records = pollster::block_on(source.fetch()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location_code, "I-1-1");
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let source = JsonFileSource::new("/nonexistent/rackyard/records.json");
        let result = pollster::block_on(source.fetch());
        assert!(matches!(result, Err(DataUnavailableError::Io(_))));
    }

    #[test]
    fn test_failing_source() {
        let result = pollster::block_on(FailingSource::new("offline").fetch());
        assert!(matches!(result, Err(DataUnavailableError::Fetch(reason)) if reason == "offline"));
    }
}
