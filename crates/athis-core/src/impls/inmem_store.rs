//! InMemoryDemandStore - 開発・テスト用の DemandStore

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Demand, DemandId, Result};
use crate::ports::DemandStore;

#[derive(Default)]
struct InMemoryStoreState {
    /// All demand records.
    records: HashMap<DemandId, Demand>,

    /// Insertion order (ids only).
    order: Vec<DemandId>,
}

/// InMemoryDemandStore はプロセス内だけで保持する DemandStore
///
/// Clone するとデータを共有します（Arc）。
#[derive(Clone, Default)]
pub struct InMemoryDemandStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryDemandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DemandStore for InMemoryDemandStore {
    async fn save(&self, demand: &Demand) -> Result<()> {
        let mut state = self.state.lock().await;
        let id = demand.id();
        if state.records.insert(id, demand.clone()).is_none() {
            state.order.push(id);
        }
        Ok(())
    }

    async fn load(&self, id: DemandId) -> Result<Option<Demand>> {
        let state = self.state.lock().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn load_all(&self) -> Result<Vec<Demand>> {
        let state = self.state.lock().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id).cloned())
            .collect())
    }
}
