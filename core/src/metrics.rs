//! Metrics aggregator: period-scoped counters and rates.
//!
//! One pass over the snapshot. Every division is guarded, so an empty
//! snapshot yields all zeros. A record missing a field only drops out
//! of the counters that need that field.

use crate::{
    birthdays,
    config::AnalyticsConfig,
    customer::CustomerRecord,
    dates,
    period::{PeriodDays, PeriodWindow},
    risk::{self, Staleness},
    types::DayCount,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_customers:           usize,
    pub active_customers:          usize,
    pub total_ltv:                 f64,
    pub average_ltv:               f64,
    pub churn_rate:                f64,
    pub new_customers_this_period: usize,
    pub upcoming_birthdays:        usize,
    pub at_risk_customers:         usize,
    pub retention_rate:            f64,
    // Thresholds the counters above were computed with.
    pub risk_threshold_days:       DayCount,
    pub birthday_window_days:      DayCount,
}

/// `part / whole * 100`, or 0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn compute_metrics(
    customers: &[CustomerRecord],
    period: PeriodDays,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Metrics {
    let window = PeriodWindow::for_period(now, period);
    let today = now.date_naive();
    let birthday_window_days = config.birthday_window_days(period);
    let birthday_horizon = dates::add_days(today, birthday_window_days);

    let mut active_customers = 0;
    let mut new_customers_this_period = 0;
    let mut upcoming_birthdays = 0;
    let mut at_risk_customers = 0;
    let mut total_ltv = 0.0;

    for customer in customers {
        total_ltv += customer.ltv();

        if customer.last_purchase().is_some_and(|at| window.reached_by(at)) {
            active_customers += 1;
        }

        if customer.created().is_some_and(|at| window.contains(at)) {
            new_customers_this_period += 1;
        }

        if birthdays::next_occurrence(customer, today).is_some_and(|next| next <= birthday_horizon) {
            upcoming_birthdays += 1;
        }

        if risk::classify(Staleness::of(customer, now), period, config).is_at_risk() {
            at_risk_customers += 1;
        }
    }

    let total_customers = customers.len();
    let average_ltv = if total_customers > 0 {
        total_ltv / total_customers as f64
    } else {
        0.0
    };

    let metrics = Metrics {
        total_customers,
        active_customers,
        total_ltv,
        average_ltv,
        churn_rate: percentage(at_risk_customers, total_customers),
        new_customers_this_period,
        upcoming_birthdays,
        at_risk_customers,
        retention_rate: percentage(active_customers, total_customers),
        risk_threshold_days: config.risk_threshold_days(period),
        birthday_window_days,
    };

    log::debug!(
        "metrics: period={period} total={} active={} new={} at_risk={} birthdays={} retention={:.1}%",
        metrics.total_customers,
        metrics.active_customers,
        metrics.new_customers_this_period,
        metrics.at_risk_customers,
        metrics.upcoming_birthdays,
        metrics.retention_rate,
    );

    metrics
}
