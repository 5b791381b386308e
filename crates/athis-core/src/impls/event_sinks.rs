//! EventSink の実装

use std::sync::{Arc, Mutex};

use crate::domain::DemandEvent;
use crate::ports::EventSink;

/// ドメインイベントを tracing の info ログとして出力
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: DemandEvent) {
        match &event {
            DemandEvent::Created { demand_id, kind, .. } => {
                tracing::info!(event = event.name(), %demand_id, %kind, "demand created");
            }
            DemandEvent::StatusChanged {
                demand_id, from, to, ..
            } => {
                tracing::info!(event = event.name(), %demand_id, %from, %to, "demand status changed");
            }
        }
    }
}

/// 受け取ったイベントをメモリに保持（テスト・開発用）
///
/// Clone すると同じバッファを共有します。
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<DemandEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DemandEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: DemandEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event);
    }
}
