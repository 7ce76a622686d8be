//! Analytics configuration: every threshold the engine applies.
//!
//! RULE: thresholds are derived here and nowhere else. The aggregator,
//! the classifier and the birthday list all call the same functions,
//! so their counts cannot drift apart.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    period::PeriodDays,
    types::DayCount,
};
use serde::{Deserialize, Serialize};

// ── Business policy constants ──────────────────────────────────────

/// Minimum inactivity, in days, before anyone is at risk.
pub const RISK_FLOOR_DAYS: DayCount = 90;
/// The risk threshold scales with the selected period by this factor.
pub const RISK_PERIOD_MULTIPLIER: DayCount = 2;
/// Beyond `threshold * HIGH_RISK_FACTOR` a customer is `alto`.
pub const HIGH_RISK_FACTOR: f64 = 1.5;
/// Birthdays always get at least this much lookahead.
pub const BIRTHDAY_MIN_WINDOW_DAYS: DayCount = 30;
/// Fixed activity window for per-segment retention.
pub const SEGMENT_ACTIVITY_WINDOW_DAYS: DayCount = 30;
/// Cap on the surfaced at-risk list.
pub const MAX_RISK_ENTRIES: usize = 10;
/// Staleness reported for a customer who never purchased.
pub const NEVER_PURCHASED_DAYS: DayCount = 365;
/// Segment label for customers without one.
pub const DEFAULT_SEGMENT: &str = "Novo";
/// Calendar months in the trend series.
pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub risk_floor_days:              DayCount,
    pub risk_period_multiplier:       DayCount,
    pub high_risk_factor:             f64,
    pub birthday_min_window_days:     DayCount,
    pub segment_activity_window_days: DayCount,
    pub max_risk_entries:             usize,
    pub never_purchased_days:         DayCount,
    pub default_segment:              String,
    pub trend_months:                 u32,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_floor_days:              RISK_FLOOR_DAYS,
            risk_period_multiplier:       RISK_PERIOD_MULTIPLIER,
            high_risk_factor:             HIGH_RISK_FACTOR,
            birthday_min_window_days:     BIRTHDAY_MIN_WINDOW_DAYS,
            segment_activity_window_days: SEGMENT_ACTIVITY_WINDOW_DAYS,
            max_risk_entries:             MAX_RISK_ENTRIES,
            never_purchased_days:         NEVER_PURCHASED_DAYS,
            default_segment:              DEFAULT_SEGMENT.to_string(),
            trend_months:                 TREND_MONTHS,
        }
    }
}

impl AnalyticsConfig {
    /// Load a config file. Missing fields fall back to the defaults above.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = Self::from_json(&content)?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> AnalyticsResult<Self> {
        let config: AnalyticsConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let positive = [
            ("risk_floor_days", self.risk_floor_days),
            ("risk_period_multiplier", self.risk_period_multiplier),
            ("birthday_min_window_days", self.birthday_min_window_days),
            ("segment_activity_window_days", self.segment_activity_window_days),
            ("never_purchased_days", self.never_purchased_days),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(AnalyticsError::InvalidConfig {
                    field,
                    reason: format!("must be > 0, got {value}"),
                });
            }
        }

        if !self.high_risk_factor.is_finite() || self.high_risk_factor < 1.0 {
            return Err(AnalyticsError::InvalidConfig {
                field:  "high_risk_factor",
                reason: format!("must be a finite value >= 1.0, got {}", self.high_risk_factor),
            });
        }
        if self.trend_months == 0 {
            return Err(AnalyticsError::InvalidConfig {
                field:  "trend_months",
                reason: "must be > 0".into(),
            });
        }
        if self.default_segment.trim().is_empty() {
            return Err(AnalyticsError::InvalidConfig {
                field:  "default_segment",
                reason: "must not be blank".into(),
            });
        }
        Ok(())
    }

    // ── Derived thresholds ─────────────────────────────────────────

    /// `max(period * multiplier, floor)`. Shared by the aggregator and
    /// the classifier.
    pub fn risk_threshold_days(&self, period: PeriodDays) -> DayCount {
        (period.days().saturating_mul(self.risk_period_multiplier)).max(self.risk_floor_days)
    }

    /// Staleness above which an at-risk customer is `alto` rather than `medio`.
    pub fn high_risk_days(&self, period: PeriodDays) -> f64 {
        self.risk_threshold_days(period) as f64 * self.high_risk_factor
    }

    /// `max(period, birthday minimum)`.
    pub fn birthday_window_days(&self, period: PeriodDays) -> DayCount {
        period.days().max(self.birthday_min_window_days)
    }

    /// Resolve a raw segment label, blank or missing meaning the default.
    pub fn segment_label<'a>(&'a self, raw: Option<&'a str>) -> &'a str {
        match raw.map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => &self.default_segment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(days: i64) -> PeriodDays {
        PeriodDays::new(days).unwrap()
    }

    #[test]
    fn risk_threshold_has_a_ninety_day_floor() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.risk_threshold_days(period(7)), 90);
        assert_eq!(cfg.risk_threshold_days(period(30)), 90);
        assert_eq!(cfg.risk_threshold_days(period(45)), 90);
        assert_eq!(cfg.risk_threshold_days(period(90)), 180);
        assert_eq!(cfg.risk_threshold_days(period(180)), 360);
    }

    #[test]
    fn birthday_window_has_a_thirty_day_floor() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.birthday_window_days(period(7)), 30);
        assert_eq!(cfg.birthday_window_days(period(30)), 30);
        assert_eq!(cfg.birthday_window_days(period(90)), 90);
    }

    #[test]
    fn thresholds_never_shrink_as_period_grows() {
        let cfg = AnalyticsConfig::default();
        let mut last_risk = 0;
        let mut last_birthday = 0;
        for days in 1..=400 {
            let risk = cfg.risk_threshold_days(period(days));
            let birthday = cfg.birthday_window_days(period(days));
            assert!(risk >= last_risk, "risk threshold shrank at {days}d");
            assert!(birthday >= last_birthday, "birthday window shrank at {days}d");
            last_risk = risk;
            last_birthday = birthday;
        }
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AnalyticsConfig::from_json(r#"{ "max_risk_entries": 25 }"#).unwrap();
        assert_eq!(cfg.max_risk_entries, 25);
        assert_eq!(cfg.risk_floor_days, RISK_FLOOR_DAYS);
        assert_eq!(cfg.default_segment, DEFAULT_SEGMENT);
    }

    #[test]
    fn validation_rejects_nonsense() {
        let err = AnalyticsConfig::from_json(r#"{ "high_risk_factor": 0.5 }"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig { field: "high_risk_factor", .. }));

        let err = AnalyticsConfig::from_json(r#"{ "risk_floor_days": 0 }"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig { field: "risk_floor_days", .. }));

        let err = AnalyticsConfig::from_json(r#"{ "default_segment": "   " }"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidConfig { field: "default_segment", .. }));
    }

    #[test]
    fn blank_segments_fall_back_to_default() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.segment_label(None), "Novo");
        assert_eq!(cfg.segment_label(Some("  ")), "Novo");
        assert_eq!(cfg.segment_label(Some(" VIP ")), "VIP");
    }
}
