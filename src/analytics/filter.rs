//! Anomaly filter orchestration
//!
//! 各検知器を実行し、7フラグの論理ORで異常行を抽出する。

use crate::analytics::types::{AnomalyFlags, DetectorStatus, FilterReport};
use crate::analytics::{decomposition, features, isolation_forest::IsolationForest, rules, statistics};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::telemetry::{parse_records, FlaggedRecord, TelemetryRecord};
use tracing::{debug, info};

/// Multi-method anomaly filter for one plant-day of five-minute telemetry.
///
/// Pure function of its input and configuration: no I/O, no shared state,
/// safe to run concurrently for different plant-days. Individual detectors
/// degrade to all-false on insufficient data; only malformed input fails.
#[derive(Debug, Clone)]
pub struct AnomalyFilter {
    config: FilterConfig,
}

impl AnomalyFilter {
    /// Create a filter with validated thresholds.
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Filter with the production default thresholds.
    pub fn with_defaults() -> Self {
        Self {
            config: FilterConfig::default(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Run every detector and combine the flags.
    pub fn evaluate(&self, records: &[TelemetryRecord]) -> FilterReport {
        let cfg = &self.config;
        let n = records.len();

        let norm_power = features::normalized_power(records);
        let diffs = features::power_diff(records);

        let low_yield = rules::low_yield(records, cfg);
        let power_drop = rules::power_drop(&diffs, cfg);
        let clipping = rules::clipping(records, &diffs, cfg);

        let powers: Vec<f64> = records
            .iter()
            .map(|r| r.active_power_effective_kw)
            .collect();
        let (residual_anomaly, decomposition_ran) =
            decomposition::residual_anomalies(&powers, cfg.seasonal_period, cfg.residual_sigma);

        let (ml_anomaly, ml_ran) = self.ml_flags(records, &norm_power);
        let (stat_outlier, statistics_ran) = statistics::stat_outliers(records, cfg);
        let temp_outlier = statistics::temp_outliers(records, cfg);

        let mut flags = Vec::with_capacity(n);
        let mut flagged_indices = Vec::new();
        for i in 0..n {
            let f = AnomalyFlags {
                low_yield: low_yield[i],
                power_drop: power_drop[i],
                clipping: clipping[i],
                residual_anomaly: residual_anomaly[i],
                ml_anomaly: ml_anomaly[i],
                stat_outlier: stat_outlier[i],
                temp_outlier: temp_outlier[i],
            };
            if f.is_anomalous() {
                flagged_indices.push(i);
            }
            flags.push(f);
        }

        info!(
            records = n,
            flagged = flagged_indices.len(),
            decomposition_ran,
            ml_ran,
            statistics_ran,
            "anomaly filter completed"
        );

        FilterReport {
            flags,
            flagged_indices,
            detectors: DetectorStatus {
                decomposition_ran,
                ml_ran,
                statistics_ran,
            },
        }
    }

    /// Flagged subset of the input, in input order.
    pub fn filter(&self, records: &[TelemetryRecord]) -> Vec<FlaggedRecord> {
        let report = self.evaluate(records);
        report
            .flagged_indices
            .iter()
            .map(|&i| FlaggedRecord::from(&records[i]))
            .collect()
    }

    /// JSON-in, JSON-out entry point: array of telemetry objects to array of
    /// flagged objects.
    pub fn filter_json(&self, payload: &str) -> Result<String> {
        let records = parse_records(payload)?;
        let flagged = self.filter(&records);
        Ok(serde_json::to_string(&flagged)?)
    }

    /// Isolation Forest flags over complete feature rows
    /// (normalized power, PR, module temperature).
    fn ml_flags(
        &self,
        records: &[TelemetryRecord],
        norm_power: &[Option<f64>],
    ) -> (Vec<bool>, bool) {
        let cfg = &self.config;
        let mut rows = Vec::new();
        let mut row_index = Vec::new();
        for (i, (r, np)) in records.iter().zip(norm_power).enumerate() {
            if let Some(np) = np {
                rows.push(vec![*np, r.five_min_pr_percent, r.pv_module_temperature_c]);
                row_index.push(i);
            }
        }

        if rows.len() < cfg.ml_min_rows {
            debug!(
                complete_rows = rows.len(),
                minimum = cfg.ml_min_rows,
                "isolation forest skipped: not enough complete feature rows"
            );
            return (vec![false; records.len()], false);
        }

        let predictions =
            IsolationForest::fit_predict(&rows, cfg.ml_trees, cfg.ml_contamination, cfg.ml_seed);
        let mut flags = vec![false; records.len()];
        for (flag, &i) in predictions.iter().zip(&row_index) {
            flags[i] = *flag;
        }
        (flags, true)
    }
}
