//! Snapshot serialization: the customer list to/from JSON.
//!
//! A snapshot is what the data-access layer hands the engine: one
//! consistent, already-fetched list. Two JSON shapes are accepted on
//! input, a bare array of records or `{ "taken_at": ..., "customers": [...] }`.

use crate::{customer::CustomerRecord, error::AnalyticsResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    #[serde(default)]
    pub taken_at:  Option<DateTime<Utc>>,
    pub customers: Vec<CustomerRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotShape {
    Bare(Vec<CustomerRecord>),
    Wrapped(CustomerSnapshot),
}

impl CustomerSnapshot {
    pub fn new(customers: Vec<CustomerRecord>, taken_at: Option<DateTime<Utc>>) -> Self {
        Self { taken_at, customers }
    }

    pub fn from_json(content: &str) -> AnalyticsResult<Self> {
        let shape: SnapshotShape = serde_json::from_str(content)?;
        Ok(match shape {
            SnapshotShape::Bare(customers) => Self { taken_at: None, customers },
            SnapshotShape::Wrapped(snapshot) => snapshot,
        })
    }

    pub fn to_json(&self) -> AnalyticsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_arrays_and_wrapped_objects() {
        let bare = CustomerSnapshot::from_json(r#"[{ "id": "a" }, { "id": "b" }]"#).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare.taken_at, None);

        let wrapped = CustomerSnapshot::from_json(
            r#"{ "taken_at": "2025-03-01T00:00:00Z", "customers": [{ "id": "a", "name": null }] }"#,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 1);
        assert!(wrapped.taken_at.is_some());
        assert_eq!(wrapped.customers[0].display_name(), "");
    }

    #[test]
    fn one_odd_record_does_not_sink_the_snapshot() {
        let snapshot = CustomerSnapshot::from_json(
            r#"[{ "id": "a" }, { "id": "b", "birthday": 19900101, "created_at": {} }]"#,
        )
        .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.customers[1].birthday, None);
        assert_eq!(snapshot.customers[1].created_at, None);
    }

    #[test]
    fn rejects_documents_that_are_not_customer_lists() {
        assert!(CustomerSnapshot::from_json(r#"{ "rows": [] }"#).is_err());
        assert!(CustomerSnapshot::from_json("42").is_err());
    }
}
