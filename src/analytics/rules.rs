//! Rule-based detectors
//!
//! ドメインルール検知（低PR、急落、クリッピング）

use crate::config::FilterConfig;
use crate::telemetry::TelemetryRecord;

/// Strong sun with PR below the strict floor.
///
/// Irradiance boundary is exclusive: 400 W/m² exactly does not fire.
pub fn low_yield(records: &[TelemetryRecord], cfg: &FilterConfig) -> Vec<bool> {
    records
        .iter()
        .map(|r| {
            r.irradiance_wm_squared > cfg.low_yield_irradiance_wm2
                && r.five_min_pr_percent < cfg.low_yield_pr_percent
        })
        .collect()
}

/// Single-step power cliff below the drop threshold.
///
/// The first row has no predecessor and never fires.
pub fn power_drop(diffs: &[Option<f64>], cfg: &FilterConfig) -> Vec<bool> {
    diffs
        .iter()
        .map(|d| matches!(d, Some(d) if *d < cfg.power_drop_kw))
        .collect()
}

/// Flat power under high irradiance (suspected inverter clipping).
pub fn clipping(records: &[TelemetryRecord], diffs: &[Option<f64>], cfg: &FilterConfig) -> Vec<bool> {
    records
        .iter()
        .zip(diffs)
        .map(|(r, d)| {
            matches!(d, Some(d) if d.abs() < cfg.clipping_flat_kw)
                && r.irradiance_wm_squared > cfg.clipping_irradiance_wm2
        })
        .collect()
}
