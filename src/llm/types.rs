//! Summarizer request/response types

use crate::analytics::FilterReport;
use crate::telemetry::FlaggedRecord;
use serde::{Deserialize, Serialize};

/// A single summarization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    /// System instruction framing the task
    pub system: String,
    /// User prompt carrying the data to summarize
    pub prompt: String,
}

/// Parsed summarizer output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Concise natural-language summary for the UI
    pub summary: String,
}

const SYSTEM_INSTRUCTION: &str = "You are a solar-plant operations summarizer. \
Given flagged five-minute telemetry rows, reply with one concise sentence \
(at most ten words) naming the dominant anomaly pattern and its time window. \
Reply with plain text only.";

impl SummaryRequest {
    /// Build the UI-summary prompt for one filter run.
    pub fn for_filter_run(
        plant_id: &str,
        report: &FilterReport,
        flagged: &[FlaggedRecord],
    ) -> Self {
        let rows = serde_json::to_string(flagged).unwrap_or_else(|_| "[]".to_string());
        let prompt = format!(
            "Plant {plant_id}: {} of {} rows flagged \
             (decomposition ran: {}, isolation forest ran: {}).\n\
             Flagged rows:\n{rows}",
            report.flagged_count(),
            report.flags.len(),
            report.detectors.decomposition_ran,
            report.detectors.ml_ran,
        );
        Self {
            system: SYSTEM_INSTRUCTION.to_string(),
            prompt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::types::{AnomalyFlags, DetectorStatus};

    #[test]
    fn test_prompt_carries_counts_and_rows() {
        let report = FilterReport {
            flags: vec![AnomalyFlags::default(); 4],
            flagged_indices: vec![2],
            detectors: DetectorStatus::default(),
        };
        let flagged = vec![FlaggedRecord {
            datetime: "2025-05-29T10:00:00Z".parse().unwrap(),
            five_min_pr_percent: 55.0,
            active_power_effective_kw: 50.0,
            irradiance_wm_squared: 950.0,
            pv_module_temperature_c: 44.0,
        }];
        let req = SummaryRequest::for_filter_run("plant-1", &report, &flagged);
        assert!(req.prompt.contains("1 of 4 rows flagged"));
        assert!(req.prompt.contains("950"));
        assert!(!req.system.is_empty());
    }
}
