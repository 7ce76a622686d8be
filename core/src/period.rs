//! Analysis period: the caller-selected lookback, validated once.
//!
//! RULE: every computation takes a `PeriodDays`, never a raw integer.
//! A zero or negative period is rejected here, so the computations
//! themselves cannot fail on it.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::DayCount,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PeriodDays(DayCount);

impl PeriodDays {
    pub fn new(days: i64) -> AnalyticsResult<Self> {
        if days <= 0 {
            return Err(AnalyticsError::InvalidPeriod { days });
        }
        Ok(Self(days))
    }

    pub fn days(self) -> DayCount {
        self.0
    }
}

impl TryFrom<i64> for PeriodDays {
    type Error = AnalyticsError;

    fn try_from(days: i64) -> AnalyticsResult<Self> {
        Self::new(days)
    }
}

impl From<PeriodDays> for i64 {
    fn from(period: PeriodDays) -> i64 {
        period.0
    }
}

impl From<AnalysisPeriod> for PeriodDays {
    fn from(preset: AnalysisPeriod) -> Self {
        Self(preset.days())
    }
}

impl fmt::Display for PeriodDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// The period presets offered by the dashboards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPeriod {
    Week,      // 7 days
    Month,     // 30 days
    Quarter,   // 90 days
    HalfYear,  // 180 days
}

impl AnalysisPeriod {
    pub const ALL: [AnalysisPeriod; 4] = [
        AnalysisPeriod::Week,
        AnalysisPeriod::Month,
        AnalysisPeriod::Quarter,
        AnalysisPeriod::HalfYear,
    ];

    pub fn days(&self) -> DayCount {
        match self {
            Self::Week     => 7,
            Self::Month    => 30,
            Self::Quarter  => 90,
            Self::HalfYear => 180,
        }
    }
}

/// `[now - period, now]`, rebuilt on every call from an explicit `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end:   DateTime<Utc>,
}

impl PeriodWindow {
    /// Window ending at `now` and reaching `days` back. A span reaching
    /// past the earliest representable instant starts there instead.
    pub fn trailing(now: DateTime<Utc>, days: DayCount) -> Self {
        let start = Duration::try_days(days)
            .and_then(|span| now.checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn for_period(now: DateTime<Utc>, period: PeriodDays) -> Self {
        Self::trailing(now, period.days())
    }

    /// Closed on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Lower bound only. Activity checks do not cap future-dated purchases.
    pub fn reached_by(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rejects_zero_and_negative_periods() {
        assert!(matches!(
            PeriodDays::new(0),
            Err(AnalyticsError::InvalidPeriod { days: 0 })
        ));
        assert!(matches!(
            PeriodDays::new(-7),
            Err(AnalyticsError::InvalidPeriod { days: -7 })
        ));
        assert_eq!(PeriodDays::new(1).unwrap().days(), 1);
    }

    #[test]
    fn presets_map_to_dashboard_day_counts() {
        let days: Vec<i64> = AnalysisPeriod::ALL
            .iter()
            .map(|p| PeriodDays::from(*p).days())
            .collect();
        assert_eq!(days, vec![7, 30, 90, 180]);
    }

    #[test]
    fn period_deserializes_through_validation() {
        let ok: PeriodDays = serde_json::from_str("90").unwrap();
        assert_eq!(ok.days(), 90);
        assert!(serde_json::from_str::<PeriodDays>("0").is_err());
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let window = PeriodWindow::trailing(now, 30);

        assert!(window.contains(now));
        assert!(window.contains(now - Duration::days(30)));
        assert!(!window.contains(now - Duration::days(30) - Duration::seconds(1)));
        assert!(!window.contains(now + Duration::seconds(1)));
        assert!(window.reached_by(now + Duration::days(3)));
    }

    #[test]
    fn huge_periods_saturate_at_the_earliest_instant() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        for days in [100_000_000, i64::MAX / 86_400 + 1, i64::MAX] {
            let window = PeriodWindow::for_period(now, PeriodDays::new(days).unwrap());
            assert_eq!(window.start, DateTime::<Utc>::MIN_UTC, "{days} days");
            assert!(window.contains(Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap()));
        }
    }
}
