//! Customer records as delivered by the data store.
//!
//! The engine only reads these. Field names match the store's columns.
//! Temporal fields stay as the raw strings the store sent; the typed
//! accessors below parse them and report `None` for anything unusable.

use crate::{dates, types::CustomerId};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(deserialize_with = "lenient_id")]
    pub id: CustomerId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub segment: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub lifetime_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_purchase_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub birthday: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

impl CustomerRecord {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_lifetime_value(mut self, value: f64) -> Self {
        self.lifetime_value = Some(value);
        self
    }

    pub fn with_last_purchase(mut self, at: DateTime<Utc>) -> Self {
        self.last_purchase_date = Some(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }

    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }

    pub fn with_birthday(mut self, date: NaiveDate) -> Self {
        self.birthday = Some(date.format("%Y-%m-%d").to_string());
        self
    }

    // ── Typed accessors ────────────────────────────────────────────

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Lifetime value coerced to a finite, non-negative amount.
    pub fn ltv(&self) -> f64 {
        match self.lifetime_value {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => 0.0,
        }
    }

    pub fn last_purchase(&self) -> Option<DateTime<Utc>> {
        parse_field(&self.id, "last_purchase_date", self.last_purchase_date.as_deref())
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_field(&self.id, "created_at", self.created_at.as_deref())
    }

    pub fn birthday_date(&self) -> Option<NaiveDate> {
        parse_field(&self.id, "birthday", self.birthday.as_deref()).map(|dt| dt.date_naive())
    }
}

fn parse_field(id: &str, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = dates::parse_instant(raw);
    if parsed.is_none() && !raw.trim().is_empty() {
        log::trace!("customer {id}: unparseable {field}={raw:?}, treated as absent");
    }
    parsed
}

/// Accept a JSON number or a numeric string. Anything else is absent.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

/// Accept a JSON string. Any other value is absent, never a failed load.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Value::String(s) => Some(s),
        other => {
            log::trace!("non-text value {other} treated as absent");
            None
        }
    }))
}

/// Ids arrive as strings or as numeric keys.
fn lenient_id<'de, D>(deserializer: D) -> Result<CustomerId, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "customer id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_value_accepts_numbers_and_numeric_strings() {
        let json = r#"[
            { "id": "a", "lifetime_value": 120.5 },
            { "id": "b", "lifetime_value": "80.25" },
            { "id": "c", "lifetime_value": null },
            { "id": "d", "lifetime_value": "n/a" },
            { "id": "e" },
            { "id": "f", "lifetime_value": -40 }
        ]"#;
        let records: Vec<CustomerRecord> = serde_json::from_str(json).unwrap();
        let ltvs: Vec<f64> = records.iter().map(CustomerRecord::ltv).collect();
        assert_eq!(ltvs, vec![120.5, 80.25, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn non_text_fields_read_as_absent() {
        let json = r#"[
            { "id": 42, "name": ["Ana"], "segment": 7, "birthday": 19900101,
              "created_at": {}, "last_purchase_date": true }
        ]"#;
        let records: Vec<CustomerRecord> = serde_json::from_str(json).unwrap();
        let record = &records[0];

        assert_eq!(record.id, "42");
        assert_eq!(record.name, None);
        assert_eq!(record.segment, None);
        assert_eq!(record.birthday, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.last_purchase_date, None);
    }

    #[test]
    fn malformed_dates_read_as_absent() {
        let record = CustomerRecord {
            id: "x".into(),
            last_purchase_date: Some("yesterday-ish".into()),
            created_at: Some("".into()),
            birthday: Some("1990-02-30".into()),
            ..CustomerRecord::default()
        };
        assert_eq!(record.last_purchase(), None);
        assert_eq!(record.created(), None);
        assert_eq!(record.birthday_date(), None);
    }

    #[test]
    fn builder_dates_round_trip_through_accessors() {
        use chrono::TimeZone;
        let at = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let bday = NaiveDate::from_ymd_opt(1991, 7, 14).unwrap();
        let record = CustomerRecord::new("id-1", "Ana")
            .with_last_purchase(at)
            .with_created_at(at)
            .with_birthday(bday);

        assert_eq!(record.last_purchase(), Some(at));
        assert_eq!(record.created(), Some(at));
        assert_eq!(record.birthday_date(), Some(bday));
        assert_eq!(record.display_name(), "Ana");
    }
}
