//! Risk classifier: ranks individually scored at-risk customers.
//!
//! This module:
//!   1. Measures each customer's staleness (whole days since last purchase)
//!   2. Assigns a severity tier against the period-scaled risk threshold
//!   3. Drops the `baixo` tier, ranks the rest stalest-first, caps the list
//!
//! The aggregator counts at-risk customers through `classify`, so the
//! count and this list always agree on who is at risk.

use crate::{
    config::AnalyticsConfig,
    customer::CustomerRecord,
    dates,
    period::PeriodDays,
    types::{CustomerId, DayCount},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const HIGH_RISK_REASON: &str = "no purchases for a long time";
pub const MEDIUM_RISK_REASON: &str = "inactive in the selected period";

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    #[serde(rename = "alto")]
    High,
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "baixo")]
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High   => "alto",
            Self::Medium => "medio",
            Self::Low    => "baixo",
        }
    }

    /// Tier label. Keyed only by level.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::High => HIGH_RISK_REASON,
            Self::Medium | Self::Low => MEDIUM_RISK_REASON,
        }
    }

    pub fn is_at_risk(&self) -> bool {
        !matches!(self, Self::Low)
    }
}

/// How long a customer has gone without buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    Days(DayCount),
    Never,
}

impl Staleness {
    pub fn of(customer: &CustomerRecord, now: DateTime<Utc>) -> Self {
        match customer.last_purchase() {
            Some(at) => Self::Days(dates::days_between(at, now)),
            None => Self::Never,
        }
    }

    /// Day count used for reporting and ranking.
    pub fn reported_days(&self, config: &AnalyticsConfig) -> DayCount {
        match self {
            Self::Days(days) => *days,
            Self::Never => config.never_purchased_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    pub id:                       CustomerId,
    pub name:                     String,
    pub segment:                  String,
    pub days_since_last_purchase: DayCount,
    pub lifetime_value:           f64,
    pub risk_level:               RiskLevel,
    pub last_purchase_date:       Option<String>,
    pub risk_reason:              String,
}

// ── Classification ───────────────────────────────────────────────────────────

/// Tier for a staleness under `period`.
///
/// A customer who never purchased is `alto` for every period, matching
/// the aggregator's unconditional at-risk rule.
pub fn classify(staleness: Staleness, period: PeriodDays, config: &AnalyticsConfig) -> RiskLevel {
    let days = match staleness {
        Staleness::Never => return RiskLevel::High,
        Staleness::Days(days) => days,
    };

    let threshold = config.risk_threshold_days(period);
    if days as f64 > config.high_risk_days(period) {
        RiskLevel::High
    } else if days > threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Score one customer.
pub fn score_customer(
    customer: &CustomerRecord,
    period: PeriodDays,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> RiskEntry {
    let staleness = Staleness::of(customer, now);
    let risk_level = classify(staleness, period, config);

    RiskEntry {
        id:                       customer.id.clone(),
        name:                     customer.display_name().to_string(),
        segment:                  config.segment_label(customer.segment.as_deref()).to_string(),
        days_since_last_purchase: staleness.reported_days(config),
        lifetime_value:           customer.ltv(),
        risk_level,
        last_purchase_date:       customer.last_purchase_date.clone(),
        risk_reason:              risk_level.reason().to_string(),
    }
}

/// Every customer scored, input order, nothing filtered.
pub fn score_customers(
    customers: &[CustomerRecord],
    period: PeriodDays,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<RiskEntry> {
    customers
        .iter()
        .map(|c| score_customer(c, period, now, config))
        .collect()
}

/// The surfaced list: `baixo` dropped, stalest first (stable on ties),
/// at most `config.max_risk_entries` long.
pub fn compute_at_risk_list(
    customers: &[CustomerRecord],
    period: PeriodDays,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<RiskEntry> {
    let mut entries: Vec<RiskEntry> = score_customers(customers, period, now, config)
        .into_iter()
        .filter(|e| e.risk_level.is_at_risk())
        .collect();

    let at_risk = entries.len();
    // `sort_by` is stable: equal staleness keeps snapshot order.
    entries.sort_by(|a, b| b.days_since_last_purchase.cmp(&a.days_since_last_purchase));
    entries.truncate(config.max_risk_entries);

    log::debug!(
        "risk: period={period} threshold={}d at_risk={at_risk} surfaced={}",
        config.risk_threshold_days(period),
        entries.len(),
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(days: i64) -> PeriodDays {
        PeriodDays::new(days).unwrap()
    }

    #[test]
    fn tier_boundaries_at_thirty_days() {
        // threshold 90, alto above 135
        let cfg = AnalyticsConfig::default();
        let p = period(30);
        assert_eq!(classify(Staleness::Days(90), p, &cfg), RiskLevel::Low);
        assert_eq!(classify(Staleness::Days(91), p, &cfg), RiskLevel::Medium);
        assert_eq!(classify(Staleness::Days(135), p, &cfg), RiskLevel::Medium);
        assert_eq!(classify(Staleness::Days(136), p, &cfg), RiskLevel::High);
        assert_eq!(classify(Staleness::Days(-3), p, &cfg), RiskLevel::Low);
    }

    #[test]
    fn never_purchased_is_high_for_every_period() {
        let cfg = AnalyticsConfig::default();
        for days in [1, 7, 30, 90, 180, 365, 1000] {
            assert_eq!(classify(Staleness::Never, period(days), &cfg), RiskLevel::High);
        }
    }

    #[test]
    fn reasons_are_keyed_by_level() {
        assert_eq!(RiskLevel::High.reason(), HIGH_RISK_REASON);
        assert_eq!(RiskLevel::Medium.reason(), MEDIUM_RISK_REASON);
        assert_eq!(RiskLevel::Low.reason(), MEDIUM_RISK_REASON);
    }

    #[test]
    fn levels_serialize_to_tier_names() {
        let json = serde_json::to_string(&[RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]).unwrap();
        assert_eq!(json, r#"["alto","medio","baixo"]"#);
        for level in [RiskLevel::High, RiskLevel::Medium, RiskLevel::Low] {
            assert_eq!(serde_json::to_string(&level).unwrap(), format!("\"{}\"", level.as_str()));
        }
    }
}
