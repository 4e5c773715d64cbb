//! Anomaly flag types
//!
//! 検知フラグと判定レポートの型定義

use serde::{Deserialize, Serialize};

/// Per-record detector flags, combined by logical OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFlags {
    /// Strong sun but PR below the strict floor (suspected soiling/loss)
    pub low_yield: bool,
    /// Sudden step-down in active power (inverter trip, grid disconnect)
    pub power_drop: bool,
    /// Flat power under high irradiance (inverter capacity clipping)
    pub clipping: bool,
    /// Decomposition residual beyond the sigma threshold
    pub residual_anomaly: bool,
    /// Isolation Forest outlier
    pub ml_anomaly: bool,
    /// Rolling-mean residual outlier or exploratory low-yield mask
    pub stat_outlier: bool,
    /// Module temperature above the day's percentile cutoff
    pub temp_outlier: bool,
}

impl AnomalyFlags {
    /// Final per-record decision: any detector firing includes the row.
    pub fn is_anomalous(&self) -> bool {
        self.low_yield
            || self.power_drop
            || self.clipping
            || self.residual_anomaly
            || self.ml_anomaly
            || self.stat_outlier
            || self.temp_outlier
    }

    /// Number of detectors that fired for this record.
    pub fn fired(&self) -> usize {
        [
            self.low_yield,
            self.power_drop,
            self.clipping,
            self.residual_anomaly,
            self.ml_anomaly,
            self.stat_outlier,
            self.temp_outlier,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }
}

/// Full evaluation result for one plant-day batch.
///
/// Keeps the per-record flags alongside the flagged subset so callers can
/// reconstruct narrower flag combinations when needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    /// Flags for every input record, in input order
    pub flags: Vec<AnomalyFlags>,
    /// Indices of flagged records, in input order
    pub flagged_indices: Vec<usize>,
    /// Which detectors were able to run
    pub detectors: DetectorStatus,
}

/// Which of the degradable detectors actually ran for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorStatus {
    /// Seasonal decomposition had at least two full periods of data
    pub decomposition_ran: bool,
    /// Isolation Forest had enough complete feature rows
    pub ml_ran: bool,
    /// Rolling-mean residual analysis produced a usable trend
    pub statistics_ran: bool,
}

impl FilterReport {
    /// Number of flagged records.
    pub fn flagged_count(&self) -> usize {
        self.flagged_indices.len()
    }
}
