//! Customer sources: the data-access seam.
//!
//! RULE: the engine never fetches. A `CustomerSource` delivers one
//! complete snapshot up front; computations run over that snapshot only.

use crate::{error::AnalyticsResult, snapshot::CustomerSnapshot};
use std::path::PathBuf;

/// The contract every data-access collaborator fulfills.
pub trait CustomerSource {
    /// Short description for logs and run headers.
    fn describe(&self) -> String;

    /// Deliver the full snapshot.
    fn fetch(&self) -> AnalyticsResult<CustomerSnapshot>;
}

/// A snapshot exported to a JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CustomerSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self) -> AnalyticsResult<CustomerSnapshot> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", self.path.display()))?;
        let snapshot = CustomerSnapshot::from_json(&content)?;
        log::info!("source: loaded {} customers from {}", snapshot.len(), self.path.display());
        Ok(snapshot)
    }
}

/// A snapshot already in memory.
pub struct InMemorySource {
    snapshot: CustomerSnapshot,
}

impl InMemorySource {
    pub fn new(snapshot: CustomerSnapshot) -> Self {
        Self { snapshot }
    }
}

impl CustomerSource for InMemorySource {
    fn describe(&self) -> String {
        format!("memory:{} customers", self.snapshot.len())
    }

    fn fetch(&self) -> AnalyticsResult<CustomerSnapshot> {
        Ok(self.snapshot.clone())
    }
}
