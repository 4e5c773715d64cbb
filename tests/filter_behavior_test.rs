//! End-to-end behavior of the anomaly filter over realistic plant-days.

use chrono::{Duration, TimeZone, Utc};
use pvwatch::telemetry::parse_records;
use pvwatch::{AnomalyFilter, Error, TelemetryRecord};

fn record(index: usize, irr: f64, power: f64, pr: f64, temp: f64) -> TelemetryRecord {
    TelemetryRecord {
        datetime: Utc.with_ymd_and_hms(2025, 5, 29, 0, 0, 0).unwrap()
            + Duration::minutes(5 * index as i64),
        irradiance_wm_squared: irr,
        pv_module_temperature_c: temp,
        active_power_effective_kw: power,
        five_min_pr_percent: pr,
    }
}

/// A full 288-sample day with a clipping fault from 10:00 to 12:00: power
/// pinned at 50 kW while irradiance climbs from 600 to 950 W/m².
fn clipping_day() -> Vec<TelemetryRecord> {
    (0..288)
        .map(|i| {
            let hour = i as f64 * 5.0 / 60.0;
            if (120..144).contains(&i) {
                // Fault window: flat output, rising sun, collapsed PR.
                let irr = 600.0 + 350.0 * (i - 120) as f64 / 23.0;
                record(i, irr, 50.0, 20.0, 28.0 + irr / 40.0)
            } else if (6.0..20.0).contains(&hour) {
                // Normal bell-shaped profile, capped below the clipping
                // irradiance threshold.
                let irr = 880.0 * (std::f64::consts::PI * (hour - 6.0) / 14.0).sin();
                record(i, irr, irr * 0.25, 85.0, 20.0 + irr / 40.0)
            } else {
                record(i, 0.0, 0.0, 0.0, 18.0)
            }
        })
        .collect()
}

#[test]
fn fault_window_is_fully_flagged() {
    let records = clipping_day();
    let filter = AnomalyFilter::with_defaults();
    let report = filter.evaluate(&records);

    for i in 120..144 {
        assert!(
            report.flags[i].is_anomalous(),
            "fault-window row {i} not flagged"
        );
    }
    // The rule-based detectors fire only inside the fault window.
    for (i, f) in report.flags.iter().enumerate() {
        if !(120..144).contains(&i) {
            assert!(!f.low_yield, "low_yield outside the window at {i}");
            assert!(!f.clipping, "clipping outside the window at {i}");
            assert!(!f.power_drop, "power_drop outside the window at {i}");
        }
    }
    // Clipping proper appears once irradiance crosses 900 under flat output.
    assert!((140..144).all(|i| report.flags[i].clipping));
}

#[test]
fn normal_rows_stay_mostly_clean() {
    let records = clipping_day();
    let filter = AnomalyFilter::with_defaults();
    let report = filter.evaluate(&records);

    let outside_flagged = report
        .flagged_indices
        .iter()
        .filter(|&&i| !(120..144).contains(&i))
        .count();
    // Statistical neighbors of the two power cliffs and percentile-based
    // detectors may pick up a handful of edge rows, nothing more.
    assert!(
        outside_flagged <= 24,
        "{outside_flagged} normal rows flagged"
    );
}

#[test]
fn output_is_an_ordered_subset_of_the_input() {
    let records = clipping_day();
    let filter = AnomalyFilter::with_defaults();
    let flagged = filter.filter(&records);

    assert!(!flagged.is_empty());
    assert!(flagged.len() <= records.len());
    for pair in flagged.windows(2) {
        assert!(pair[0].datetime < pair[1].datetime, "order not preserved");
    }
    for row in &flagged {
        assert!(
            records.iter().any(|r| r.datetime == row.datetime
                && r.active_power_effective_kw == row.active_power_effective_kw),
            "output row not present in the input"
        );
    }
}

#[test]
fn repeated_runs_agree() {
    let records = clipping_day();
    let filter = AnomalyFilter::with_defaults();
    let first = filter.evaluate(&records);
    let second = filter.evaluate(&records);
    assert_eq!(first.flags, second.flags);
    assert_eq!(first.flagged_indices, second.flagged_indices);
}

#[test]
fn daily_period_needs_two_days_before_decomposition_runs() {
    let records = clipping_day();
    let filter =
        AnomalyFilter::new(pvwatch::FilterConfig::default().with_daily_period()).unwrap();
    let report = filter.evaluate(&records);
    // 288 samples is exactly one full day: below two cycles, the
    // decomposition degrades while everything else still runs.
    assert!(!report.detectors.decomposition_ran);
    assert!(report.detectors.ml_ran);
    assert!(report.detectors.statistics_ran);
    for i in 120..144 {
        assert!(report.flags[i].is_anomalous());
    }
}

#[test]
fn five_records_yield_a_degraded_but_valid_result() {
    let records: Vec<TelemetryRecord> = (0..5)
        .map(|i| record(i, 500.0, 200.0, 85.0, 30.0))
        .collect();
    let filter = AnomalyFilter::with_defaults();
    let report = filter.evaluate(&records);

    assert!(!report.detectors.ml_ran);
    assert!(!report.detectors.decomposition_ran);
    for f in &report.flags {
        assert!(!f.ml_anomaly);
        assert!(!f.residual_anomaly);
    }
}

#[test]
fn zero_irradiance_never_panics_or_flags_by_itself() {
    let mut records: Vec<TelemetryRecord> = (0..20)
        .map(|i| record(i, 500.0, 200.0, 85.0, 30.0))
        .collect();
    records[7].irradiance_wm_squared = 0.0;
    records[7].active_power_effective_kw = 200.0;

    let filter = AnomalyFilter::with_defaults();
    let report = filter.evaluate(&records);
    assert_eq!(report.flags.len(), 20);
    assert!(!report.flags[7].low_yield);
    assert!(!report.flags[7].clipping);
}

#[test]
fn malformed_payload_fails_before_any_detector() {
    let missing_power = r#"[{
        "datetime": "2025-05-29T06:00:00Z",
        "irradiance_wm_squared": 14.5,
        "pv_module_temperature_c": 24.05,
        "five_min_pr_percent": 67.65
    }]"#;
    match parse_records(missing_power) {
        Err(Error::MalformedInput(msg)) => {
            assert!(msg.contains("active_power_effective_kw"));
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }

    let filter = AnomalyFilter::with_defaults();
    assert!(matches!(
        filter.filter_json(missing_power),
        Err(Error::MalformedInput(_))
    ));
}

#[test]
fn boundary_values_follow_the_strict_rules() {
    let filter = AnomalyFilter::with_defaults();

    // irradiance 401 / PR 59.9 fires; irradiance 400 exactly does not.
    let rows = vec![
        record(0, 401.0, 100.0, 59.9, 30.0),
        record(1, 400.0, 100.0, 59.9, 30.0),
    ];
    let report = filter.evaluate(&rows);
    assert!(report.flags[0].low_yield);
    assert!(!report.flags[1].low_yield);

    // −99 kW step passes, −101 kW step is a drop.
    let gentle = vec![
        record(0, 500.0, 500.0, 85.0, 30.0),
        record(1, 500.0, 401.0, 85.0, 30.0),
    ];
    let cliff = vec![
        record(0, 500.0, 500.0, 85.0, 30.0),
        record(1, 500.0, 399.0, 85.0, 30.0),
    ];
    assert!(!filter.evaluate(&gentle).flags[1].power_drop);
    assert!(filter.evaluate(&cliff).flags[1].power_drop);
}

#[test]
fn arbitrary_input_order_is_tolerated() {
    // The filter relies on the datetime column, not index continuity; a
    // shuffled batch still yields one flag per row without panicking.
    let mut records = clipping_day();
    records.swap(10, 250);
    records.swap(60, 200);
    let filter = AnomalyFilter::with_defaults();
    let report = filter.evaluate(&records);
    assert_eq!(report.flags.len(), records.len());
}
