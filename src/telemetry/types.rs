//! Telemetry record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One five-minute sample for a plant.
///
/// Field names follow the upstream telemetry feed. Records for one filter
/// call belong to a single plant and a single day; ordering is normally
/// chronological but the filter only relies on the `datetime` column for
/// time-aware operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Sample timestamp (UTC)
    pub datetime: DateTime<Utc>,
    /// Solar irradiance (W/m²)
    pub irradiance_wm_squared: f64,
    /// PV module temperature (°C)
    pub pv_module_temperature_c: f64,
    /// Effective active power output (kW)
    pub active_power_effective_kw: f64,
    /// Five-minute performance ratio (%), may be out of range
    pub five_min_pr_percent: f64,
}

/// One flagged sample, restricted to the columns the caller needs.
///
/// Same shape as [`TelemetryRecord`]; kept separate so the output contract
/// stays fixed even if the input record grows more columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedRecord {
    pub datetime: DateTime<Utc>,
    pub five_min_pr_percent: f64,
    pub active_power_effective_kw: f64,
    pub irradiance_wm_squared: f64,
    pub pv_module_temperature_c: f64,
}

impl From<&TelemetryRecord> for FlaggedRecord {
    fn from(r: &TelemetryRecord) -> Self {
        Self {
            datetime: r.datetime,
            five_min_pr_percent: r.five_min_pr_percent,
            active_power_effective_kw: r.active_power_effective_kw,
            irradiance_wm_squared: r.irradiance_wm_squared,
            pv_module_temperature_c: r.pv_module_temperature_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip() {
        let json = r#"{
            "datetime": "2025-05-29T06:00:00Z",
            "irradiance_wm_squared": 14.5,
            "pv_module_temperature_c": 24.05,
            "active_power_effective_kw": 9.72,
            "five_min_pr_percent": 67.65
        }"#;
        let rec: TelemetryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.irradiance_wm_squared, 14.5);
        assert_eq!(rec.five_min_pr_percent, 67.65);

        let back = serde_json::to_string(&rec).unwrap();
        let rec2: TelemetryRecord = serde_json::from_str(&back).unwrap();
        assert_eq!(rec, rec2);
    }

    #[test]
    fn test_flagged_record_keeps_core_columns() {
        let rec = TelemetryRecord {
            datetime: "2025-05-29T10:00:00Z".parse().unwrap(),
            irradiance_wm_squared: 950.0,
            pv_module_temperature_c: 44.0,
            active_power_effective_kw: 50.0,
            five_min_pr_percent: 55.0,
        };
        let flagged = FlaggedRecord::from(&rec);
        assert_eq!(flagged.datetime, rec.datetime);
        assert_eq!(flagged.active_power_effective_kw, 50.0);
    }
}
