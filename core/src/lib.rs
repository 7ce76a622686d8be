//! Customer lifecycle analytics.
//!
//! Turns a snapshot of customer records into activity and retention
//! metrics, a ranked churn-risk list, per-segment summaries, upcoming
//! birthdays and a monthly trend series. Everything here is a pure,
//! synchronous function of (snapshot, period, now).

pub mod birthdays;
pub mod config;
pub mod customer;
pub mod dates;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod name_generator;
pub mod period;
pub mod risk;
pub mod rng;
pub mod segments;
pub mod snapshot;
pub mod source;
pub mod synthetic;
pub mod trends;
pub mod types;

pub use config::AnalyticsConfig;
pub use customer::CustomerRecord;
pub use engine::{LifecycleEngine, LifecycleReport};
pub use error::{AnalyticsError, AnalyticsResult};
pub use period::{AnalysisPeriod, PeriodDays};
