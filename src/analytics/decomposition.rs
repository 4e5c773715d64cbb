//! Additive seasonal decomposition
//!
//! 加法モデルによる季節分解（トレンド・季節成分・残差）と残差異常検知

use tracing::warn;

/// Trend, seasonal and residual components of an additive decomposition.
///
/// Trend and residual are undefined for the half-window at each edge of the
/// series, mirroring a centered moving-average trend.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub trend: Vec<Option<f64>>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<Option<f64>>,
}

/// Decompose `values` with the given seasonal period.
///
/// Returns `None` when the series is shorter than two complete cycles, the
/// minimum for estimating a per-phase seasonal mean.
pub fn seasonal_decompose(values: &[f64], period: usize) -> Option<Decomposition> {
    let n = values.len();
    if period < 2 || n < 2 * period {
        return None;
    }

    let trend = centered_trend(values, period);

    // Per-phase means of the detrended series, then centered so the seasonal
    // component sums to zero over one period.
    let mut phase_sum = vec![0.0f64; period];
    let mut phase_count = vec![0usize; period];
    for (i, t) in trend.iter().enumerate() {
        if let Some(t) = t {
            phase_sum[i % period] += values[i] - t;
            phase_count[i % period] += 1;
        }
    }
    let mut phase_mean = vec![0.0f64; period];
    for i in 0..period {
        if phase_count[i] == 0 {
            return None;
        }
        phase_mean[i] = phase_sum[i] / phase_count[i] as f64;
    }
    let grand_mean = phase_mean.iter().sum::<f64>() / period as f64;
    for m in &mut phase_mean {
        *m -= grand_mean;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| phase_mean[i % period]).collect();
    let residual: Vec<Option<f64>> = (0..n)
        .map(|i| trend[i].map(|t| values[i] - t - seasonal[i]))
        .collect();

    Some(Decomposition {
        trend,
        seasonal,
        residual,
    })
}

/// Centered moving-average trend.
///
/// Even periods use a window of `period + 1` samples with half weight on the
/// endpoints, odd periods a plain `period`-sample window. Edges where the
/// window does not fit are undefined.
fn centered_trend(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut trend = vec![None; n];
    if period % 2 == 0 {
        let half = period / 2;
        for i in half..n.saturating_sub(half) {
            let mut sum = 0.5 * (values[i - half] + values[i + half]);
            for j in (i - half + 1)..(i + half) {
                sum += values[j];
            }
            trend[i] = Some(sum / period as f64);
        }
    } else {
        let half = (period - 1) / 2;
        for i in half..n.saturating_sub(half) {
            let sum: f64 = values[(i - half)..=(i + half)].iter().sum();
            trend[i] = Some(sum / period as f64);
        }
    }
    trend
}

/// Flag rows whose decomposition residual exceeds `sigma` standard
/// deviations. Returns the flags and whether the detector ran; below two
/// full periods it degrades to all-false instead of failing.
pub fn residual_anomalies(values: &[f64], period: usize, sigma: f64) -> (Vec<bool>, bool) {
    let n = values.len();
    let Some(decomp) = seasonal_decompose(values, period) else {
        warn!(
            samples = n,
            period, "seasonal decomposition skipped: fewer than two complete cycles"
        );
        return (vec![false; n], false);
    };

    let residuals: Vec<f64> = decomp.residual.iter().flatten().copied().collect();
    let Some(std) = sample_std(&residuals) else {
        warn!("seasonal decomposition residuals too sparse for a std estimate");
        return (vec![false; n], false);
    };

    let threshold = sigma * std;
    let flags = decomp
        .residual
        .iter()
        .map(|r| matches!(r, Some(r) if r.abs() > threshold))
        .collect();
    (flags, true)
}

/// Sample standard deviation (N-1 denominator); `None` below two values.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal_series(cycles: usize, period: usize) -> Vec<f64> {
        // Linear trend plus a clean periodic component.
        (0..cycles * period)
            .map(|i| {
                let phase = (i % period) as f64 / period as f64;
                100.0 + 0.1 * i as f64 + 20.0 * (2.0 * std::f64::consts::PI * phase).sin()
            })
            .collect()
    }

    #[test]
    fn test_decompose_requires_two_cycles() {
        let series = seasonal_series(2, 12);
        assert!(seasonal_decompose(&series[..23], 12).is_none());
        assert!(seasonal_decompose(&series, 12).is_some());
    }

    #[test]
    fn test_clean_series_has_small_residuals() {
        let series = seasonal_series(4, 12);
        let decomp = seasonal_decompose(&series, 12).unwrap();
        for r in decomp.residual.iter().flatten() {
            assert!(r.abs() < 1.0, "residual {r} unexpectedly large");
        }
    }

    #[test]
    fn test_spike_is_flagged() {
        let mut series = seasonal_series(6, 12);
        series[30] += 200.0;
        let (flags, ran) = residual_anomalies(&series, 12, 3.0);
        assert!(ran);
        assert!(flags[30], "injected spike must exceed the residual threshold");
    }

    #[test]
    fn test_short_series_degrades_without_panic() {
        let (flags, ran) = residual_anomalies(&[1.0, 2.0, 3.0, 4.0, 5.0], 48, 3.0);
        assert!(!ran);
        assert_eq!(flags, vec![false; 5]);
    }

    #[test]
    fn test_edges_have_no_trend() {
        let series = seasonal_series(3, 12);
        let decomp = seasonal_decompose(&series, 12).unwrap();
        assert!(decomp.trend[0].is_none());
        assert!(decomp.trend[5].is_none());
        assert!(decomp.trend[6].is_some());
        assert!(decomp.trend[series.len() - 6].is_none());
    }
}
