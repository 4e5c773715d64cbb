//! In-memory store
//!
//! プロセス内HashMapによる保存層実装。

use crate::error::{Error, Result};
use crate::store::types::{
    Investigation, InvestigationEvent, InvestigationFilter, InvestigationId, InvestigationStatus,
    InvestigationState, Workorder, WorkorderStatus,
};
use crate::store::InvestigationStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process store backed by `HashMap`s behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    investigations: Arc<RwLock<HashMap<InvestigationId, Investigation>>>,
    workorders: Arc<RwLock<HashMap<String, Workorder>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: &InvestigationId, apply: F) -> Result<Investigation>
    where
        F: FnOnce(&mut Investigation),
    {
        let mut investigations = self.investigations.write().await;
        let investigation = investigations
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("investigation {id}")))?;
        apply(investigation);
        investigation.updated_at = Utc::now();
        Ok(investigation.clone())
    }
}

#[async_trait]
impl InvestigationStore for MemoryStore {
    async fn create(&self, investigation: Investigation) -> Result<Investigation> {
        let mut investigations = self.investigations.write().await;
        if investigations.contains_key(&investigation.id) {
            return Err(Error::Store(format!(
                "investigation {} already exists",
                investigation.id
            )));
        }
        investigations.insert(investigation.id.clone(), investigation.clone());
        Ok(investigation)
    }

    async fn get(&self, id: &InvestigationId) -> Result<Option<Investigation>> {
        let investigations = self.investigations.read().await;
        Ok(investigations.get(id).cloned())
    }

    async fn list(&self, filter: &InvestigationFilter) -> Result<Vec<Investigation>> {
        let investigations = self.investigations.read().await;
        let mut result: Vec<Investigation> = investigations.values().cloned().collect();

        if let Some(ref plant_id) = filter.plant_id {
            result.retain(|inv| inv.plant_id == *plant_id);
        }
        if let Some(status) = filter.status {
            result.retain(|inv| inv.status == status);
        }
        result.sort_by_key(|inv| inv.created_at);
        Ok(result)
    }

    async fn update_status(
        &self,
        id: &InvestigationId,
        status: InvestigationStatus,
    ) -> Result<Investigation> {
        self.modify(id, |inv| {
            inv.status = status;
            if matches!(
                status,
                InvestigationStatus::Completed
                    | InvestigationStatus::Failed
                    | InvestigationStatus::Cancelled
            ) {
                inv.completed_at = Some(Utc::now());
            }
        })
        .await
    }

    async fn append_event(
        &self,
        id: &InvestigationId,
        event: InvestigationEvent,
    ) -> Result<Investigation> {
        self.modify(id, |inv| inv.events.push(event)).await
    }

    async fn update_state(
        &self,
        id: &InvestigationId,
        state: InvestigationState,
    ) -> Result<Investigation> {
        self.modify(id, |inv| inv.state = state).await
    }

    async fn create_workorder(&self, workorder: Workorder) -> Result<Workorder> {
        let investigations = self.investigations.read().await;
        if !investigations.contains_key(&workorder.investigation_id) {
            return Err(Error::NotFound(format!(
                "investigation {}",
                workorder.investigation_id
            )));
        }
        drop(investigations);

        let mut workorders = self.workorders.write().await;
        workorders.insert(workorder.id.clone(), workorder.clone());
        Ok(workorder)
    }

    async fn get_workorder(&self, id: &str) -> Result<Option<Workorder>> {
        let workorders = self.workorders.read().await;
        Ok(workorders.get(id).cloned())
    }

    async fn list_workorders(&self, investigation_id: &InvestigationId) -> Result<Vec<Workorder>> {
        let workorders = self.workorders.read().await;
        let mut result: Vec<Workorder> = workorders
            .values()
            .filter(|wo| wo.investigation_id == *investigation_id)
            .cloned()
            .collect();
        result.sort_by_key(|wo| wo.created_at);
        Ok(result)
    }

    async fn update_workorder_status(
        &self,
        id: &str,
        status: WorkorderStatus,
    ) -> Result<Workorder> {
        let mut workorders = self.workorders.write().await;
        let workorder = workorders
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("workorder {id}")))?;
        workorder.status = status;
        workorder.updated_at = Utc::now();
        Ok(workorder.clone())
    }
}
