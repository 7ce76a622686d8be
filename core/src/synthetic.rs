//! Synthetic customer snapshots: seeded, reproducible populations.
//!
//! Used by `crm-report --synthetic` and by the test suite. A snapshot is
//! a pure function of (size, seed, anchor): same inputs, same JSON.
//! A small share of records carries missing or malformed fields on
//! purpose, as real exports do.

use crate::{
    customer::CustomerRecord,
    error::AnalyticsResult,
    name_generator::NameGenerator,
    rng::{RngBank, StreamRng, StreamSlot},
    snapshot::CustomerSnapshot,
    source::CustomerSource,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Longest tenure generated, in days.
pub const MAX_TENURE_DAYS: i64 = 3 * 365;

const BUSINESS_SHARE: f64 = 0.08;
const BIRTHDAY_SHARE: f64 = 0.75;

/// Per-segment shape of the generated population.
struct SegmentProfile {
    label:              Option<&'static str>,
    never_purchased:    f64,
    /// Pareto scale for days since last purchase.
    recency_scale_days: f64,
    /// Pareto scale for lifetime value.
    ltv_scale:          f64,
}

static PROFILES: [(SegmentProfile, f64); 5] = [
    (SegmentProfile { label: Some("VIP"),       never_purchased: 0.00, recency_scale_days: 10.0, ltv_scale: 800.0 }, 0.10),
    (SegmentProfile { label: Some("Regular"),   never_purchased: 0.02, recency_scale_days: 20.0, ltv_scale: 200.0 }, 0.40),
    (SegmentProfile { label: Some("Ocasional"), never_purchased: 0.05, recency_scale_days: 45.0, ltv_scale: 60.0 },  0.20),
    (SegmentProfile { label: Some("Novo"),      never_purchased: 0.50, recency_scale_days: 30.0, ltv_scale: 40.0 },  0.15),
    (SegmentProfile { label: None,              never_purchased: 0.40, recency_scale_days: 40.0, ltv_scale: 50.0 },  0.15),
];

pub struct SyntheticPopulation {
    pub size:   usize,
    pub seed:   u64,
    pub anchor: DateTime<Utc>,
}

impl SyntheticPopulation {
    pub fn new(size: usize, seed: u64, anchor: DateTime<Utc>) -> Self {
        Self { size, seed, anchor }
    }

    pub fn generate(&self) -> CustomerSnapshot {
        let bank = RngBank::new(self.seed);
        let mut streams = Streams {
            identity: bank.for_stream(StreamSlot::Identity),
            segment:  bank.for_stream(StreamSlot::Segment),
            signup:   bank.for_stream(StreamSlot::Signup),
            purchase: bank.for_stream(StreamSlot::Purchase),
            birthday: bank.for_stream(StreamSlot::Birthday),
            value:    bank.for_stream(StreamSlot::Value),
            defects:  bank.for_stream(StreamSlot::Defects),
        };

        let customers: Vec<CustomerRecord> = (0..self.size)
            .map(|_| self.generate_customer(&mut streams))
            .collect();

        log::debug!(
            "synthetic: generated {} customers (seed={}, anchor={})",
            customers.len(),
            self.seed,
            self.anchor,
        );

        CustomerSnapshot::new(customers, Some(self.anchor))
    }

    fn generate_customer(&self, s: &mut Streams) -> CustomerRecord {
        let id = uuid::Builder::from_random_bytes(s.identity.next_bytes16())
            .into_uuid()
            .to_string();
        let name = if s.identity.chance(BUSINESS_SHARE) {
            NameGenerator::generate_business_name(&mut s.identity)
        } else {
            NameGenerator::generate_full_name(&mut s.identity)
        };

        let profile = s
            .segment
            .weighted(&PROFILES)
            .unwrap_or(&PROFILES[0].0);

        let mut record = CustomerRecord::new(id, name);
        record.segment = profile.label.map(str::to_string);

        // Signup somewhere in the last MAX_TENURE_DAYS.
        let tenure_days = s.signup.range_inclusive(0, MAX_TENURE_DAYS);
        let created = self.anchor
            - Duration::days(tenure_days)
            - Duration::seconds(s.signup.range_inclusive(0, 86_399));
        record = record.with_created_at(created);

        // Last purchase never predates signup.
        let purchased = !s.purchase.chance(profile.never_purchased);
        if purchased {
            let raw = s.purchase.pareto(profile.recency_scale_days, 1.1) - profile.recency_scale_days;
            let days_since = (raw.round() as i64).clamp(0, tenure_days);
            let at = self.anchor
                - Duration::days(days_since)
                - Duration::seconds(s.purchase.range_inclusive(0, 3_600 * 8));
            record = record.with_last_purchase(at.max(created));

            let ltv = s.value.pareto(profile.ltv_scale, 1.5);
            record = record.with_lifetime_value((ltv * 100.0).round() / 100.0);
        } else {
            record = record.with_lifetime_value(0.0);
        }

        if s.birthday.chance(BIRTHDAY_SHARE) {
            let year = s.birthday.range_inclusive(1950, 2006) as i32;
            let month = s.birthday.range_inclusive(1, 12) as u32;
            let day = s.birthday.range_inclusive(1, 28) as u32;
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                record = record.with_birthday(date);
            }
        }

        inject_defects(&mut record, &mut s.defects);
        record
    }
}

struct Streams {
    identity: StreamRng,
    segment:  StreamRng,
    signup:   StreamRng,
    purchase: StreamRng,
    birthday: StreamRng,
    value:    StreamRng,
    defects:  StreamRng,
}

/// The kinds of damage real exports show.
fn inject_defects(record: &mut CustomerRecord, rng: &mut StreamRng) {
    if rng.chance(0.03) && record.last_purchase_date.is_some() {
        record.last_purchase_date = Some("invalid-date".into());
    }
    if rng.chance(0.02) {
        record.created_at = None;
    }
    if rng.chance(0.02) {
        record.lifetime_value = None;
    }
    if rng.chance(0.01) && record.birthday.is_some() {
        record.birthday = Some("00/00".into());
    }
    if rng.chance(0.01) {
        record.segment = Some("  ".into());
    }
}

impl CustomerSource for SyntheticPopulation {
    fn describe(&self) -> String {
        format!("synthetic:{} customers (seed={})", self.size, self.seed)
    }

    fn fetch(&self) -> AnalyticsResult<CustomerSnapshot> {
        Ok(self.generate())
    }
}
