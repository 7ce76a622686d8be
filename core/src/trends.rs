//! Monthly trend series: new and active customers per calendar month.
//!
//! Covers the last `trend_months` months, oldest first, ending with the
//! month containing `now`. Each month is `[first day, first day of next
//! month)` in UTC.

use crate::{config::AnalyticsConfig, customer::CustomerRecord, dates};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun",
    "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// `YYYY-MM`
    pub month:            String,
    pub label:            String,
    pub new_customers:    usize,
    pub active_customers: usize,
    /// Mean lifetime value of the month's active customers, rounded.
    pub avg_ltv:          f64,
}

struct MonthBucket {
    year:   i32,
    month:  u32,
    start:  DateTime<Utc>,
    end:    DateTime<Utc>,
    new:    usize,
    active: usize,
    ltv:    f64,
}

impl MonthBucket {
    fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

pub fn compute_trends(
    customers: &[CustomerRecord],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<TrendPoint> {
    let mut buckets: Vec<MonthBucket> = (0..config.trend_months)
        .rev()
        .filter_map(|back| {
            let (year, month) = dates::shift_month(now.year(), now.month(), back);
            let start = dates::month_start(year, month)?;
            let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
            let end = dates::month_start(next_year, next_month)?;
            Some(MonthBucket { year, month, start, end, new: 0, active: 0, ltv: 0.0 })
        })
        .collect();

    for customer in customers {
        if let Some(created) = customer.created() {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(created)) {
                bucket.new += 1;
            }
        }
        if let Some(purchased) = customer.last_purchase() {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(purchased)) {
                bucket.active += 1;
                bucket.ltv += customer.ltv();
            }
        }
    }

    let points: Vec<TrendPoint> = buckets
        .into_iter()
        .map(|b| TrendPoint {
            month:            format!("{:04}-{:02}", b.year, b.month),
            label:            MONTH_LABELS[(b.month - 1) as usize].to_string(),
            new_customers:    b.new,
            active_customers: b.active,
            avg_ltv:          if b.active > 0 { (b.ltv / b.active as f64).round() } else { 0.0 },
        })
        .collect();

    log::debug!("trends: months={}", points.len());
    points
}
