use chrono::{DateTime, Duration, TimeZone, Utc};
use crm_lifecycle_core::{
    snapshot::CustomerSnapshot,
    source::{CustomerSource, InMemorySource, JsonFileSource},
    synthetic::SyntheticPopulation,
    AnalyticsConfig, AnalyticsError, CustomerRecord, LifecycleEngine, PeriodDays,
};
use std::path::PathBuf;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("crm-lifecycle-{}-{name}", std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// An in-memory source hands back exactly what it was given.
#[test]
fn in_memory_source_round_trips() {
    init_logging();
    let snapshot = CustomerSnapshot::new(
        vec![CustomerRecord::new("a", "Ana").with_last_purchase(now() - Duration::days(200))],
        Some(now()),
    );
    let source = InMemorySource::new(snapshot.clone());

    assert_eq!(source.fetch().unwrap(), snapshot);
    let report = LifecycleEngine::default()
        .report_from(&source, PeriodDays::new(30).unwrap(), now())
        .unwrap();
    assert_eq!(report.metrics.at_risk_customers, 1);
    assert_eq!(report.at_risk.len(), 1);
}

/// A JSON export on disk loads with lenient field handling.
#[test]
fn json_file_source_reads_exports() {
    init_logging();
    let path = temp_file(
        "export.json",
        r#"{
            "taken_at": "2025-06-15T12:00:00Z",
            "customers": [
                { "id": "1", "name": "Ana", "segment": "VIP", "lifetime_value": "1200.00",
                  "last_purchase_date": "2025-06-10 09:15:00+00", "birthday": "1990-06-20",
                  "created_at": "2025-06-01T08:00:00Z" },
                { "id": "2", "name": null, "segment": null, "lifetime_value": null,
                  "last_purchase_date": null, "birthday": null, "created_at": null }
            ]
        }"#,
    );
    let source = JsonFileSource::new(&path);
    let snapshot = source.fetch().unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.taken_at, Some(now()));

    let m = LifecycleEngine::default().compute_metrics(&snapshot.customers, PeriodDays::new(30).unwrap(), now());
    assert_eq!(m.total_customers, 2);
    assert_eq!(m.active_customers, 1);
    assert_eq!(m.new_customers_this_period, 1);
    assert_eq!(m.upcoming_birthdays, 1);
    assert_eq!(m.at_risk_customers, 1);
    assert_eq!(m.total_ltv, 1200.0);
}

/// A missing file surfaces as an error, not a panic.
#[test]
fn missing_file_is_an_error() {
    let source = JsonFileSource::new("/nonexistent/crm-lifecycle/customers.json");
    assert!(source.describe().contains("customers.json"));
    assert!(matches!(source.fetch(), Err(AnalyticsError::Other(_))));
}

/// Garbage JSON is a serialization error.
#[test]
fn malformed_json_is_a_serialization_error() {
    let path = temp_file("broken.json", "{ not json");
    let result = JsonFileSource::new(&path).fetch();
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(AnalyticsError::Serialization(_))));
}

/// The synthetic generator works as a source too.
#[test]
fn synthetic_population_is_a_source() {
    let population = SyntheticPopulation::new(25, 1, now());
    let snapshot = population.fetch().unwrap();
    assert_eq!(snapshot.len(), 25);
    assert!(population.describe().contains("seed=1"));
}

/// Config files override only what they name; bad values are rejected.
#[test]
fn config_file_loads_and_validates() {
    let good = temp_file("config.json", r#"{ "max_risk_entries": 5, "default_segment": "Sem segmento" }"#);
    let cfg = AnalyticsConfig::load(good.to_str().unwrap()).unwrap();
    std::fs::remove_file(&good).ok();

    assert_eq!(cfg.max_risk_entries, 5);
    assert_eq!(cfg.default_segment, "Sem segmento");
    assert_eq!(cfg.risk_floor_days, 90);

    let bad = temp_file("bad-config.json", r#"{ "high_risk_factor": 0.5 }"#);
    assert!(AnalyticsConfig::load(bad.to_str().unwrap()).is_err());
    std::fs::remove_file(&bad).ok();

    assert!(AnalyticsConfig::load("/nonexistent/crm-lifecycle/config.json").is_err());
}

/// A record with non-text dates still loads and still counts.
#[test]
fn non_text_dates_degrade_only_their_record() {
    let path = temp_file(
        "odd-types.json",
        r#"[
            { "id": "a", "last_purchase_date": "2025-06-10T00:00:00Z" },
            { "id": 2, "birthday": 19900101, "created_at": {}, "last_purchase_date": 20250610,
              "segment": false, "lifetime_value": "75" }
        ]"#,
    );
    let snapshot = JsonFileSource::new(&path).fetch().unwrap();
    std::fs::remove_file(&path).ok();

    let m = LifecycleEngine::default().compute_metrics(&snapshot.customers, PeriodDays::new(30).unwrap(), now());
    assert_eq!(m.total_customers, 2);
    assert_eq!(m.active_customers, 1);
    assert_eq!(m.at_risk_customers, 1, "unusable purchase date reads as never purchased");
    assert_eq!(m.upcoming_birthdays, 0);
    assert_eq!(m.total_ltv, 75.0);
    assert_eq!(snapshot.customers[1].id, "2");
}
