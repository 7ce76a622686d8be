//! Shared primitive types used across the analytics engine.

/// Opaque, stable customer identifier as issued by the data store.
pub type CustomerId = String;

/// A whole number of days. Signed: a purchase dated after `now`
/// yields a negative staleness rather than an error.
pub type DayCount = i64;

/// Milliseconds in one day. Day differences are floored on this unit.
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
