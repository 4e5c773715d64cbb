//! Statistical outlier detectors
//!
//! 中心化移動平均の残差による外れ値検知と、温度パーセンタイル検知。
//! 季節分解・Isolation Forestとは独立したセカンドオピニオン。

use crate::config::FilterConfig;
use crate::telemetry::TelemetryRecord;
use statrs::statistics::{Data, OrderStatistics};
use tracing::warn;

/// Rolling-mean residual outliers plus the exploratory low-yield mask.
///
/// Trend is a centered rolling mean with window `max(5, N/20)`; edge
/// positions where the window does not fit borrow the nearest computed
/// value. Residuals beyond `stat_outlier_sigma` population standard
/// deviations fire, as does any row under strong sun with PR below the
/// exploratory ceiling. Returns the flags and whether the residual part ran.
pub fn stat_outliers(records: &[TelemetryRecord], cfg: &FilterConfig) -> (Vec<bool>, bool) {
    let n = records.len();
    let powers: Vec<f64> = records
        .iter()
        .map(|r| r.active_power_effective_kw)
        .collect();

    let window = (n / 20).max(5);
    let (residual_flags, ran) = match rolling_residuals(&powers, window) {
        Some(residuals) => {
            let std = population_std(&residuals);
            let threshold = cfg.stat_outlier_sigma * std;
            (
                residuals.iter().map(|r| r.abs() > threshold).collect(),
                true,
            )
        }
        None => {
            warn!(
                samples = n,
                window, "rolling-mean residual analysis skipped: window never fits"
            );
            (vec![false; n], false)
        }
    };

    let flags = records
        .iter()
        .zip(&residual_flags)
        .map(|(r, &res)| {
            res || (r.irradiance_wm_squared > cfg.low_yield_irradiance_wm2
                && r.five_min_pr_percent < cfg.exploratory_pr_percent)
        })
        .collect();
    (flags, ran)
}

/// Residuals against a centered rolling mean, with back/forward fill at the
/// edges. `None` when no position fits the full window.
fn rolling_residuals(values: &[f64], window: usize) -> Option<Vec<f64>> {
    let n = values.len();
    let left = window - 1 - (window - 1) / 2;
    let right = (window - 1) / 2;
    if n < window {
        return None;
    }

    let mut trend = vec![f64::NAN; n];
    for i in left..(n - right) {
        let sum: f64 = values[(i - left)..=(i + right)].iter().sum();
        trend[i] = sum / window as f64;
    }

    // bfill then ffill
    let first = trend[left];
    let last = trend[n - right - 1];
    for t in trend.iter_mut().take(left) {
        *t = first;
    }
    for t in trend.iter_mut().skip(n - right) {
        *t = last;
    }

    Some(values.iter().zip(&trend).map(|(v, t)| v - t).collect())
}

/// Population standard deviation (N denominator).
fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Rows whose module temperature exceeds the day's percentile cutoff.
pub fn temp_outliers(records: &[TelemetryRecord], cfg: &FilterConfig) -> Vec<bool> {
    if records.is_empty() {
        return Vec::new();
    }
    let temps: Vec<f64> = records.iter().map(|r| r.pv_module_temperature_c).collect();
    let mut data = Data::new(temps.clone());
    let cutoff = data.percentile(cfg.temp_percentile.round() as usize);
    temps.iter().map(|&t| t > cutoff).collect()
}
