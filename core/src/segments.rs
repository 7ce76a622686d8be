//! Segment summarizer: per-segment value and recent activity.
//!
//! Recent activity uses the fixed `segment_activity_window_days`, not
//! the caller's period. Groups come back in first-appearance order and
//! are never ranked or truncated.

use crate::{
    config::AnalyticsConfig,
    customer::CustomerRecord,
    metrics::percentage,
    period::PeriodWindow,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment:             String,
    pub count:               usize,
    pub total_ltv:           f64,
    pub avg_ltv:             f64,
    pub recent_active_count: usize,
    pub retention_rate:      f64,
}

impl SegmentSummary {
    fn empty(segment: &str) -> Self {
        Self {
            segment:             segment.to_string(),
            count:               0,
            total_ltv:           0.0,
            avg_ltv:             0.0,
            recent_active_count: 0,
            retention_rate:      0.0,
        }
    }
}

pub fn summarize_segments(
    customers: &[CustomerRecord],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<SegmentSummary> {
    let window = PeriodWindow::trailing(now, config.segment_activity_window_days);

    let mut summaries: Vec<SegmentSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for customer in customers {
        let label = config.segment_label(customer.segment.as_deref());
        let slot = match index.get(label) {
            Some(&slot) => slot,
            None => {
                summaries.push(SegmentSummary::empty(label));
                index.insert(label.to_string(), summaries.len() - 1);
                summaries.len() - 1
            }
        };

        let summary = &mut summaries[slot];
        summary.count += 1;
        summary.total_ltv += customer.ltv();
        if customer.last_purchase().is_some_and(|at| window.reached_by(at)) {
            summary.recent_active_count += 1;
        }
    }

    for summary in &mut summaries {
        // count >= 1 for every group that exists
        summary.avg_ltv = summary.total_ltv / summary.count as f64;
        summary.retention_rate = percentage(summary.recent_active_count, summary.count);
    }

    log::debug!(
        "segments: window={}d groups={} customers={}",
        config.segment_activity_window_days,
        summaries.len(),
        customers.len(),
    );

    summaries
}
