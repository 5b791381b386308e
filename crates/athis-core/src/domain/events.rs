//! Events - ドメインイベント
//!
//! Lifecycle Manager が永続化に成功した後に `EventSink` へ送ります。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::demand::DemandKind;
use super::ids::DemandId;
use super::status::DemandStatus;

/// DemandEvent はドメインで発生したイベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemandEvent {
    Created {
        demand_id: DemandId,
        kind: DemandKind,
        at: DateTime<Utc>,
    },
    StatusChanged {
        demand_id: DemandId,
        from: DemandStatus,
        to: DemandStatus,
        at: DateTime<Utc>,
    },
}

impl DemandEvent {
    pub fn demand_id(&self) -> DemandId {
        match self {
            DemandEvent::Created { demand_id, .. } | DemandEvent::StatusChanged { demand_id, .. } => {
                *demand_id
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemandEvent::Created { .. } => "demand_created",
            DemandEvent::StatusChanged { .. } => "demand_status_changed",
        }
    }
}
