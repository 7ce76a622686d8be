//! The lifecycle engine: one config, every computation.
//!
//! RULES:
//!   - Every call is a pure function of (snapshot, period, now).
//!   - `now` is always passed in; the engine never reads a clock.
//!   - Nothing is cached between calls. Callers that want to skip
//!     recomputation cache the returned report.

use crate::{
    birthdays::{self, UpcomingBirthday},
    config::AnalyticsConfig,
    customer::CustomerRecord,
    error::AnalyticsResult,
    metrics::{self, Metrics},
    period::PeriodDays,
    risk::{self, RiskEntry},
    segments::{self, SegmentSummary},
    source::CustomerSource,
    trends::{self, TrendPoint},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything the CRM dashboard shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleReport {
    pub generated_at: DateTime<Utc>,
    pub period_days:  PeriodDays,
    pub metrics:      Metrics,
    pub at_risk:      Vec<RiskEntry>,
    pub segments:     Vec<SegmentSummary>,
    pub birthdays:    Vec<UpcomingBirthday>,
    pub trends:       Vec<TrendPoint>,
}

#[derive(Debug, Clone, Default)]
pub struct LifecycleEngine {
    config: AnalyticsConfig,
}

impl LifecycleEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn compute_metrics(
        &self,
        customers: &[CustomerRecord],
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> Metrics {
        metrics::compute_metrics(customers, period, now, &self.config)
    }

    pub fn score_customers(
        &self,
        customers: &[CustomerRecord],
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> Vec<RiskEntry> {
        risk::score_customers(customers, period, now, &self.config)
    }

    pub fn compute_at_risk_list(
        &self,
        customers: &[CustomerRecord],
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> Vec<RiskEntry> {
        risk::compute_at_risk_list(customers, period, now, &self.config)
    }

    pub fn summarize_segments(
        &self,
        customers: &[CustomerRecord],
        now: DateTime<Utc>,
    ) -> Vec<SegmentSummary> {
        segments::summarize_segments(customers, now, &self.config)
    }

    pub fn upcoming_birthdays(
        &self,
        customers: &[CustomerRecord],
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> Vec<UpcomingBirthday> {
        birthdays::upcoming_birthdays(customers, period, now, &self.config)
    }

    pub fn compute_trends(
        &self,
        customers: &[CustomerRecord],
        now: DateTime<Utc>,
    ) -> Vec<TrendPoint> {
        trends::compute_trends(customers, now, &self.config)
    }

    /// All computations over one snapshot with one `now`.
    pub fn report(
        &self,
        customers: &[CustomerRecord],
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> LifecycleReport {
        let report = LifecycleReport {
            generated_at: now,
            period_days:  period,
            metrics:      self.compute_metrics(customers, period, now),
            at_risk:      self.compute_at_risk_list(customers, period, now),
            segments:     self.summarize_segments(customers, now),
            birthdays:    self.upcoming_birthdays(customers, period, now),
            trends:       self.compute_trends(customers, now),
        };
        log::info!(
            "report: period={period} customers={} at_risk={} surfaced={} segments={}",
            report.metrics.total_customers,
            report.metrics.at_risk_customers,
            report.at_risk.len(),
            report.segments.len(),
        );
        report
    }

    /// Fetch once from `source`, then report over that snapshot.
    pub fn report_from(
        &self,
        source: &dyn CustomerSource,
        period: PeriodDays,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<LifecycleReport> {
        let snapshot = source.fetch()?;
        log::debug!("engine: {} delivered {} customers", source.describe(), snapshot.len());
        Ok(self.report(&snapshot.customers, period, now))
    }
}
