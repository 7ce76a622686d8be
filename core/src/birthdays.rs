//! Upcoming birthdays within the lookahead window.
//!
//! Dates are compared as UTC calendar days: a birthday falling today is
//! upcoming with `days_until == 0`. This follows the CRM birthday
//! calendar, not the dashboard counter that rolls it to next year. The
//! list length always equals the aggregator's `upcoming_birthdays` for
//! the same inputs.

use crate::{
    config::AnalyticsConfig,
    customer::CustomerRecord,
    dates,
    period::PeriodDays,
    types::{CustomerId, DayCount},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingBirthday {
    pub id:            CustomerId,
    pub name:          String,
    pub segment:       String,
    pub next_birthday: NaiveDate,
    pub days_until:    DayCount,
    pub is_today:      bool,
}

/// Next occurrence of the customer's birthday on or after `today`.
pub fn next_occurrence(customer: &CustomerRecord, today: NaiveDate) -> Option<NaiveDate> {
    customer
        .birthday_date()
        .and_then(|birthday| dates::next_birthday(birthday, today))
}

pub fn upcoming_birthdays(
    customers: &[CustomerRecord],
    period: PeriodDays,
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> Vec<UpcomingBirthday> {
    let today = now.date_naive();
    let window = config.birthday_window_days(period);

    let mut upcoming: Vec<UpcomingBirthday> = customers
        .iter()
        .filter_map(|customer| {
            let next = next_occurrence(customer, today)?;
            let days_until = (next - today).num_days();
            (days_until <= window).then(|| UpcomingBirthday {
                id:            customer.id.clone(),
                name:          customer.display_name().to_string(),
                segment:       config.segment_label(customer.segment.as_deref()).to_string(),
                next_birthday: next,
                days_until,
                is_today:      days_until == 0,
            })
        })
        .collect();

    upcoming.sort_by_key(|b| b.days_until);
    log::debug!("birthdays: window={window}d upcoming={}", upcoming.len());
    upcoming
}
