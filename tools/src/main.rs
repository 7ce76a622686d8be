//! crm-report: headless customer lifecycle report.
//!
//! Usage:
//!   crm-report --input customers.json --period 30
//!   crm-report --synthetic 500 --seed 42 --period 90 --json
//!   crm-report --input export.json --now 2025-06-01T12:00:00Z --config analytics.json

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crm_lifecycle_core::{
    engine::{LifecycleEngine, LifecycleReport},
    source::{CustomerSource, JsonFileSource},
    synthetic::SyntheticPopulation,
    AnalysisPeriod, AnalyticsConfig, PeriodDays,
};
use std::env;

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    source: String,
    report: &'a LifecycleReport,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let synthetic = parse_arg(&args, "--synthetic", 0usize);
    let json_mode = args.iter().any(|a| a == "--json");
    let input = flag_value(&args, "--input");
    let config_path = flag_value(&args, "--config");
    let now_arg = flag_value(&args, "--now");

    let period = match flag_value(&args, "--period") {
        Some(raw) => {
            let days: i64 = raw
                .parse()
                .with_context(|| format!("--period must be a whole number of days, got {raw:?}"))?;
            PeriodDays::new(days)?
        }
        None => PeriodDays::from(AnalysisPeriod::Month),
    };
    let config = match config_path {
        Some(path) => AnalyticsConfig::load(path)?,
        None => AnalyticsConfig::default(),
    };

    let explicit_now = now_arg
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("--now must be RFC 3339, got {raw:?}"))
        })
        .transpose()?;

    let source: Box<dyn CustomerSource> = match (input, synthetic) {
        (Some(path), _) => Box::new(JsonFileSource::new(path)),
        (None, n) if n > 0 => {
            let anchor = explicit_now.unwrap_or_else(Utc::now);
            Box::new(SyntheticPopulation::new(n, seed, anchor))
        }
        (None, _) => anyhow::bail!("either --input <file> or --synthetic <count> is required"),
    };

    let snapshot = source.fetch()?;
    // The only wall-clock read: explicit flag, then snapshot time, then now.
    let now = explicit_now.or(snapshot.taken_at).unwrap_or_else(Utc::now);

    let engine = LifecycleEngine::new(config);
    let report = engine.report(&snapshot.customers, period, now);

    if json_mode {
        let out = JsonOutput { source: source.describe(), report: &report };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("CRM lifecycle report");
        println!("  source:    {}", source.describe());
        println!("  period:    {period}");
        println!("  now:       {now}");
        println!();
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &LifecycleReport) {
    let m = &report.metrics;

    println!("=== METRICS ===");
    println!("  customers:      {}", m.total_customers);
    println!("  active:         {}", m.active_customers);
    println!("  new in period:  {}", m.new_customers_this_period);
    println!("  at risk:        {} (threshold {}d)", m.at_risk_customers, m.risk_threshold_days);
    println!("  birthdays:      {} (next {}d)", m.upcoming_birthdays, m.birthday_window_days);
    println!("  total LTV:      R$ {:.2}", m.total_ltv);
    println!("  average LTV:    R$ {:.2}", m.average_ltv);
    println!("  retention:      {:.1}%", m.retention_rate);
    println!("  churn:          {:.1}%", m.churn_rate);

    println!();
    println!("=== AT RISK (top {}) ===", report.at_risk.len());
    if report.at_risk.is_empty() {
        println!("  (nobody at risk)");
    }
    for entry in &report.at_risk {
        println!(
            "  {:<5} {:>4}d  R$ {:>9.2}  {:<10} {}",
            entry.risk_level.as_str(),
            entry.days_since_last_purchase,
            entry.lifetime_value,
            entry.segment,
            entry.name,
        );
    }

    println!();
    println!("=== SEGMENTS ===");
    for s in &report.segments {
        println!(
            "  {:<12} n={:<5} avg LTV R$ {:>9.2}  retention {:>5.1}%",
            s.segment, s.count, s.avg_ltv, s.retention_rate
        );
    }

    println!();
    println!("=== BIRTHDAYS ===");
    if report.birthdays.is_empty() {
        println!("  (none in window)");
    }
    for b in report.birthdays.iter().take(10) {
        let when = if b.is_today { "today".to_string() } else { format!("in {}d", b.days_until) };
        println!("  {}  {:<8} {}", b.next_birthday, when, b.name);
    }

    println!();
    println!("=== TRENDS ===");
    for t in &report.trends {
        println!(
            "  {} {} | new {:>4} | active {:>4} | avg LTV R$ {:.0}",
            t.month, t.label, t.new_customers, t.active_customers, t.avg_ltv
        );
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    match flag_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring unparseable {flag}={raw:?}");
            default
        }),
        None => default,
    }
}
