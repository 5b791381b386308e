//! DemandLifecycleManager - Demand の作成と状態遷移
//!
//! # 排他制御
//! - 同じ id への `transition` は id ごとの async Mutex で直列化
//! - 後から来た側はロック取得後に最新の状態を読み直して再検証する
//!   （勝者の結果を上書きしない）
//! - 異なる id の操作は並行に進む
//! - ロックを保持したまま外部 I/O（ルーティング）を行うことはない
//! - ロック表のエントリは削除しない。Demand は削除されないので、件数はストア内の
//!   Demand 数（遷移を受けたもの）で頭打ちになる

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::app::stats::DemandStats;
use crate::domain::{
    AthisError, Demand, DemandEvent, DemandId, DemandStatus, NewDemand, Result,
};
use crate::impls::TracingEventSink;
use crate::ports::{Clock, DemandStore, EventSink, IdGenerator, SystemClock, UlidGenerator};

/// Attempts to draw an id not already present in the store.
const MAX_ID_ATTEMPTS: usize = 8;

/// Ordering of `list` results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Insertion order.
    #[default]
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub status: Option<DemandStatus>,
    pub order: ListOrder,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: DemandStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.order = ListOrder::NewestFirst;
        self
    }
}

pub struct DemandLifecycleManager {
    store: Arc<dyn DemandStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    locks: Mutex<HashMap<DemandId, Arc<tokio::sync::Mutex<()>>>>,
}

impl DemandLifecycleManager {
    pub fn new(
        store: Arc<dyn DemandStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            ids,
            clock,
            events,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// System clock, ULID ids and tracing events.
    pub fn with_store(store: Arc<dyn DemandStore>) -> Self {
        Self::new(
            store,
            Arc::new(UlidGenerator::new(SystemClock)),
            Arc::new(SystemClock),
            Arc::new(TracingEventSink),
        )
    }

    pub async fn create(&self, input: NewDemand) -> Result<Demand> {
        input.validate()?;
        let id = self.allocate_id().await?;
        let demand = Demand::open(id, input, self.clock.now());
        self.store.save(&demand).await?;

        tracing::debug!(demand_id = %id, kind = %demand.kind(), "demand persisted");
        self.events.emit(DemandEvent::Created {
            demand_id: id,
            kind: demand.kind(),
            at: demand.created_at(),
        });
        Ok(demand)
    }

    pub async fn get(&self, id: DemandId) -> Result<Demand> {
        self.store
            .load(id)
            .await?
            .ok_or_else(|| AthisError::not_found("demand", id))
    }

    pub async fn list(&self, query: ListQuery) -> Result<Vec<Demand>> {
        let mut demands: Vec<Demand> = self
            .store
            .load_all()
            .await?
            .into_iter()
            .filter(|d| query.status.is_none_or(|status| d.status() == status))
            .collect();
        if query.order == ListOrder::NewestFirst {
            demands.reverse();
        }
        Ok(demands)
    }

    /// The only mutator of `status`. Persists before returning.
    pub async fn transition(&self, id: DemandId, next: DemandStatus) -> Result<Demand> {
        // demands are never deleted, so existence checked here still holds under the lock
        self.get(id).await?;

        let lock = self.lock_for(id);
        let (demand, from) = {
            let _guard = lock.lock().await;
            let mut demand = self.get(id).await?;
            let from = match demand.advance(next) {
                Ok(from) => from,
                Err(err) => {
                    tracing::warn!(demand_id = %id, from = %demand.status(), to = %next, "transition rejected");
                    return Err(err);
                }
            };
            self.store.save(&demand).await?;
            (demand, from)
        };

        self.events.emit(DemandEvent::StatusChanged {
            demand_id: id,
            from,
            to: next,
            at: self.clock.now(),
        });
        Ok(demand)
    }

    pub async fn stats(&self) -> Result<DemandStats> {
        let demands = self.store.load_all().await?;
        Ok(DemandStats::from_demands(&demands))
    }

    async fn allocate_id(&self) -> Result<DemandId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate_demand_id();
            if self.store.load(id).await?.is_none() {
                return Ok(id);
            }
            tracing::warn!(demand_id = %id, "generated id already taken, drawing again");
        }
        Err(AthisError::storage("could not allocate a unique demand id"))
    }

    fn lock_for(&self, id: DemandId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(locks) => locks,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(locks.entry(id).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DemandKind, GeoPoint, Requester};
    use crate::impls::{InMemoryDemandStore, RecordingEventSink};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    struct Fixture {
        manager: DemandLifecycleManager,
        events: RecordingEventSink,
    }

    fn fixture() -> Fixture {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap());
        let events = RecordingEventSink::new();
        let manager = DemandLifecycleManager::new(
            Arc::new(InMemoryDemandStore::new()),
            Arc::new(UlidGenerator::new(clock)),
            Arc::new(clock),
            Arc::new(events.clone()),
        );
        Fixture { manager, events }
    }

    fn maria() -> NewDemand {
        NewDemand {
            kind: DemandKind::LandRegularization,
            description: "lote sem escritura".to_string(),
            address: "Rua das Flores, 123 - Centro".to_string(),
            location: GeoPoint::new(-19.7492, -47.9292),
            requester: Requester {
                name: "Maria Silva".to_string(),
                phone: "(34) 99999-9999".to_string(),
                email: "maria@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn create_starts_pending_and_emits_event() {
        let f = fixture();
        let demand = f.manager.create(maria()).await.unwrap();

        assert_eq!(demand.status(), DemandStatus::Pending);
        assert_eq!(
            demand.created_at(),
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
        );
        assert_eq!(f.manager.get(demand.id()).await.unwrap(), demand);

        let events = f.events.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DemandEvent::Created { demand_id, .. } if demand_id == demand.id()));
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_persisting() {
        let f = fixture();
        let mut nameless = maria();
        nameless.requester.name = String::new();
        assert!(matches!(
            f.manager.create(nameless).await,
            Err(AthisError::Validation { .. })
        ));

        let mut far = maria();
        far.location = GeoPoint::new(-19.0, 200.0);
        assert!(matches!(
            f.manager.create(far).await,
            Err(AthisError::Validation { .. })
        ));

        assert!(f.manager.list(ListQuery::all()).await.unwrap().is_empty());
        assert!(f.events.events().is_empty());
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let f = fixture();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let demand = f.manager.create(maria()).await.unwrap();
            assert!(seen.insert(demand.id()));
        }
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let f = fixture();
        let id = DemandId::from_ulid(ulid::Ulid::new());
        assert!(matches!(
            f.manager.get(id).await,
            Err(AthisError::NotFound { .. })
        ));
        assert!(matches!(
            f.manager.transition(id, DemandStatus::Approved).await,
            Err(AthisError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn transition_persists_and_emits() {
        let f = fixture();
        let demand = f.manager.create(maria()).await.unwrap();

        let reviewed = f
            .manager
            .transition(demand.id(), DemandStatus::UnderReview)
            .await
            .unwrap();
        assert_eq!(reviewed.status(), DemandStatus::UnderReview);
        assert_eq!(
            f.manager.get(demand.id()).await.unwrap().status(),
            DemandStatus::UnderReview
        );

        let events = f.events.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            DemandEvent::StatusChanged {
                from: DemandStatus::Pending,
                to: DemandStatus::UnderReview,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn same_status_and_backward_moves_fail() {
        let f = fixture();
        let id = f.manager.create(maria()).await.unwrap().id();

        assert!(matches!(
            f.manager.transition(id, DemandStatus::Pending).await,
            Err(AthisError::InvalidTransition { .. })
        ));
        f.manager.transition(id, DemandStatus::Approved).await.unwrap();
        for target in [
            DemandStatus::Approved,
            DemandStatus::UnderReview,
            DemandStatus::Pending,
            DemandStatus::Rejected,
        ] {
            assert!(matches!(
                f.manager.transition(id, target).await,
                Err(AthisError::InvalidTransition { .. })
            ));
        }
        assert_eq!(f.manager.get(id).await.unwrap().status(), DemandStatus::Approved);
        // created + one successful transition
        assert_eq!(f.events.events().len(), 2);
    }

    #[tokio::test]
    async fn list_filters_and_orders() {
        let f = fixture();
        let a = f.manager.create(maria()).await.unwrap();
        let b = f.manager.create(maria()).await.unwrap();
        let c = f.manager.create(maria()).await.unwrap();
        f.manager
            .transition(b.id(), DemandStatus::Rejected)
            .await
            .unwrap();

        let all: Vec<DemandId> = f
            .manager
            .list(ListQuery::all())
            .await
            .unwrap()
            .iter()
            .map(Demand::id)
            .collect();
        assert_eq!(all, vec![a.id(), b.id(), c.id()]);

        let newest: Vec<DemandId> = f
            .manager
            .list(ListQuery::all().newest_first())
            .await
            .unwrap()
            .iter()
            .map(Demand::id)
            .collect();
        assert_eq!(newest, vec![c.id(), b.id(), a.id()]);

        let pending: Vec<DemandId> = f
            .manager
            .list(ListQuery::with_status(DemandStatus::Pending))
            .await
            .unwrap()
            .iter()
            .map(Demand::id)
            .collect();
        assert_eq!(pending, vec![a.id(), c.id()]);
    }

    #[tokio::test]
    async fn stats_reflect_store() {
        let f = fixture();
        let a = f.manager.create(maria()).await.unwrap();
        let mut improvement = maria();
        improvement.kind = DemandKind::HousingImprovement;
        f.manager.create(improvement).await.unwrap();
        f.manager
            .transition(a.id(), DemandStatus::UnderReview)
            .await
            .unwrap();

        let stats = f.manager.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.under_review, 1);
        assert_eq!(stats.housing_improvement, 1);
    }

    #[tokio::test]
    async fn lock_table_holds_one_entry_per_transitioned_demand() {
        let f = fixture();
        let a = f.manager.create(maria()).await.unwrap().id();
        let b = f.manager.create(maria()).await.unwrap().id();
        f.manager.create(maria()).await.unwrap();

        f.manager.transition(a, DemandStatus::UnderReview).await.unwrap();
        f.manager.transition(a, DemandStatus::Approved).await.unwrap();
        let _ = f.manager.transition(a, DemandStatus::Rejected).await;
        f.manager.transition(b, DemandStatus::Rejected).await.unwrap();

        assert_eq!(f.manager.locks.lock().unwrap().len(), 2);
    }
}
