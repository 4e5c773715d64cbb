//! Investigation records
//!
//! 調査・作業指示レコードの保存層。単一のトレイトと起動時に選ぶ
//! 1実装のみを持つ。

pub mod memory;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;
use types::{
    Investigation, InvestigationEvent, InvestigationFilter, InvestigationId, InvestigationStatus,
    Workorder, WorkorderStatus,
};

pub use memory::MemoryStore;

/// Storage abstraction for investigations and their workorders.
#[async_trait]
pub trait InvestigationStore: Send + Sync + std::fmt::Debug {
    async fn create(&self, investigation: Investigation) -> Result<Investigation>;
    async fn get(&self, id: &InvestigationId) -> Result<Option<Investigation>>;
    async fn list(&self, filter: &InvestigationFilter) -> Result<Vec<Investigation>>;
    async fn update_status(
        &self,
        id: &InvestigationId,
        status: InvestigationStatus,
    ) -> Result<Investigation>;
    async fn append_event(
        &self,
        id: &InvestigationId,
        event: InvestigationEvent,
    ) -> Result<Investigation>;
    /// Replace the typed state record of an investigation.
    async fn update_state(
        &self,
        id: &InvestigationId,
        state: types::InvestigationState,
    ) -> Result<Investigation>;

    async fn create_workorder(&self, workorder: Workorder) -> Result<Workorder>;
    async fn get_workorder(&self, id: &str) -> Result<Option<Workorder>>;
    async fn list_workorders(&self, investigation_id: &InvestigationId) -> Result<Vec<Workorder>>;
    async fn update_workorder_status(&self, id: &str, status: WorkorderStatus)
        -> Result<Workorder>;
}
