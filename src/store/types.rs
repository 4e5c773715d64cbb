//! Investigation and workorder record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationId(pub String);

impl InvestigationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InvestigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvestigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InvestigationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvestigationStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Event types in an investigation's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    User,
    Agent,
    System,
    ToolCall,
    ToolResult,
}

/// One entry in the ordered event log of an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationEvent {
    pub kind: EventKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl InvestigationEvent {
    pub fn new(kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Named, versioned per-investigation state.
///
/// Replaces the free-form key bag the agent pipeline used to mutate; every
/// field a consumer relies on is spelled out here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestigationState {
    /// Schema version for forward migrations
    pub version: u32,
    /// Number of telemetry rows the filter flagged
    pub flagged_row_count: Option<usize>,
    /// Flagged rows as serialized JSON, in input order
    pub flagged_rows_json: Option<String>,
    /// Natural-language summary produced by the summarizer
    pub summary: Option<String>,
}

/// One anomaly investigation for a plant-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investigation {
    pub id: InvestigationId,
    pub plant_id: String,
    /// Plant-day under investigation (ISO date)
    pub date: chrono::NaiveDate,
    pub status: InvestigationStatus,
    pub state: InvestigationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub events: Vec<InvestigationEvent>,
}

impl Investigation {
    pub fn new(plant_id: impl Into<String>, date: chrono::NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: InvestigationId::new(),
            plant_id: plant_id.into(),
            date,
            status: InvestigationStatus::Pending,
            state: InvestigationState::default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
            error_message: None,
            events: Vec::new(),
        }
    }
}

/// Listing filter for investigations.
#[derive(Debug, Clone, Default)]
pub struct InvestigationFilter {
    pub plant_id: Option<String>,
    pub status: Option<InvestigationStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkorderStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkorderType {
    Maintenance,
    Inspection,
    Repair,
    Analysis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A maintenance/inspection task derived from an investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workorder {
    pub id: String,
    pub investigation_id: InvestigationId,
    pub workorder_type: WorkorderType,
    pub status: WorkorderStatus,
    pub priority: Priority,
    /// Short summary of the required work
    pub summary: String,
    /// Free-form analysis and recommendations
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workorder {
    pub fn new(
        investigation_id: InvestigationId,
        workorder_type: WorkorderType,
        priority: Priority,
        summary: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            investigation_id,
            workorder_type,
            status: WorkorderStatus::Pending,
            priority,
            summary: summary.into(),
            detail: None,
            created_at: now,
            updated_at: now,
        }
    }
}
