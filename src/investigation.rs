//! Investigation workflow
//!
//! 1プラント日の調査実行。フィルタ実行・レコード更新・要約・作業指示
//! 起票をひとつのフローにまとめる。

use crate::analytics::AnomalyFilter;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::llm::{Summarizer, SummaryRequest};
use crate::store::types::{
    EventKind, Investigation, InvestigationEvent, InvestigationState, InvestigationStatus,
    Priority, Workorder, WorkorderType,
};
use crate::store::InvestigationStore;
use crate::telemetry::{parse_records, FlaggedRecord};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info};

/// Application context: every long-lived collaborator, constructed once at
/// process start and passed by reference. No module-level globals.
pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn InvestigationStore>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn InvestigationStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            config,
            store,
            summarizer,
        }
    }
}

/// Run one investigation: filter the supplied telemetry for a plant-day,
/// record the outcome, summarize it, and raise a workorder when anything was
/// flagged. Returns the completed investigation record.
pub async fn run_investigation(
    ctx: &AppContext,
    plant_id: &str,
    date: NaiveDate,
    telemetry_json: String,
) -> Result<Investigation> {
    let records = parse_records(&telemetry_json)?;

    let investigation = ctx
        .store
        .create(Investigation::new(plant_id, date))
        .await?;
    let id = investigation.id.clone();
    info!(%id, plant_id, %date, records = records.len(), "investigation started");

    ctx.store
        .update_status(&id, InvestigationStatus::Running)
        .await?;
    ctx.store
        .append_event(
            &id,
            InvestigationEvent::new(
                EventKind::System,
                format!("filtering {} telemetry rows", records.len()),
            ),
        )
        .await?;

    // The filter is CPU-bound; keep it off the async runtime's workers.
    let filter = AnomalyFilter::new(ctx.config.filter.clone())?;
    let batch = records.clone();
    let (report, flagged) = tokio::task::spawn_blocking(move || {
        let report = filter.evaluate(&batch);
        let flagged: Vec<FlaggedRecord> = report
            .flagged_indices
            .iter()
            .map(|&i| FlaggedRecord::from(&batch[i]))
            .collect();
        (report, flagged)
    })
    .await
    .map_err(|e| {
        let msg = format!("filter task failed: {e}");
        error!(%id, "{msg}");
        Error::Store(msg)
    })?;

    ctx.store
        .append_event(
            &id,
            InvestigationEvent::new(
                EventKind::ToolResult,
                format!("{} of {} rows flagged", flagged.len(), records.len()),
            ),
        )
        .await?;

    let summary = match ctx
        .summarizer
        .generate(SummaryRequest::for_filter_run(plant_id, &report, &flagged))
        .await
    {
        Ok(response) => Some(response.summary),
        Err(e) => {
            // Summaries are decoration; the investigation result stands
            // without one.
            error!(%id, "summarizer failed: {e}");
            None
        }
    };

    ctx.store
        .update_state(
            &id,
            InvestigationState {
                version: 1,
                flagged_row_count: Some(flagged.len()),
                flagged_rows_json: Some(serde_json::to_string(&flagged)?),
                summary: summary.clone(),
            },
        )
        .await?;

    if !flagged.is_empty() {
        let priority = if flagged.len() * 5 >= records.len() {
            Priority::High
        } else {
            Priority::Medium
        };
        let workorder = Workorder::new(
            id.clone(),
            WorkorderType::Analysis,
            priority,
            summary.unwrap_or_else(|| format!("review {} flagged telemetry rows", flagged.len())),
        );
        ctx.store.create_workorder(workorder).await?;
    }

    let completed = ctx
        .store
        .update_status(&id, InvestigationStatus::Completed)
        .await?;
    info!(%id, flagged = flagged.len(), "investigation completed");
    Ok(completed)
}
