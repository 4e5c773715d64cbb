//! Derived features
//!
//! 派生特徴量の計算（正規化出力、移動平均、一次差分）

use crate::telemetry::TelemetryRecord;

/// Power normalized by irradiance.
///
/// Zero irradiance makes the ratio undefined; those rows yield `None`
/// instead of infinity so downstream detectors can skip them.
pub fn normalized_power(records: &[TelemetryRecord]) -> Vec<Option<f64>> {
    records
        .iter()
        .map(|r| {
            if r.irradiance_wm_squared == 0.0 {
                None
            } else {
                Some(r.active_power_effective_kw / r.irradiance_wm_squared)
            }
        })
        .collect()
}

/// Trailing moving average of active power.
///
/// Window of `window` samples, minimum one, so leading rows still get a
/// value from the partial window.
pub fn smoothed_power(records: &[TelemetryRecord], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(records.len());
    let mut sum = 0.0;
    for i in 0..records.len() {
        sum += records[i].active_power_effective_kw;
        if i >= window {
            sum -= records[i - window].active_power_effective_kw;
        }
        let len = (i + 1).min(window) as f64;
        out.push(sum / len);
    }
    out
}

/// First difference of active power; `None` for the first row.
pub fn power_diff(records: &[TelemetryRecord]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(records.len());
    for i in 0..records.len() {
        if i == 0 {
            out.push(None);
        } else {
            out.push(Some(
                records[i].active_power_effective_kw - records[i - 1].active_power_effective_kw,
            ));
        }
    }
    out
}
