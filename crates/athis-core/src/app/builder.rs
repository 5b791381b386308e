//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 必須コンポーネント（DemandStore）が無ければ `build()` が `Configuration` を返す
//! - ルーティングのクレデンシャル不備は `GraphHopperClient::new` の時点で検出（初回呼び出しまで遅延しない）
//! - 省略可能な協調オブジェクト（Clock, IdGenerator, EventSink）は本番用の既定値で埋める

use std::sync::Arc;

use crate::app::api::AthisApi;
use crate::app::lifecycle::DemandLifecycleManager;
use crate::app::priority_router::AreaPriorityRouter;
use crate::app::retry::RetryPolicy;
use crate::config::{AthisConfig, StorageBackend};
use crate::domain::{AreaCatalog, AthisError, Result};
use crate::impls::{GraphHopperClient, InMemoryDemandStore, JsonFileDemandStore, TracingEventSink};
use crate::ports::{
    Clock, DemandStore, EventSink, IdGenerator, RouteProvider, SystemClock, UlidGenerator,
};

/// # 使用例
/// ```ignore
/// let api = AppBuilder::new()
///     .store(Arc::new(InMemoryDemandStore::new()))
///     .route_provider(Arc::new(GraphHopperClient::new(settings)?))
///     .build()?;
/// ```
pub struct AppBuilder {
    store: Option<Arc<dyn DemandStore>>,
    routes: Option<Arc<dyn RouteProvider>>,
    catalog: AreaCatalog,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    events: Option<Arc<dyn EventSink>>,
    retry: RetryPolicy,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            routes: None,
            catalog: AreaCatalog::seed(),
            clock: None,
            ids: None,
            events: None,
            retry: RetryPolicy::none(),
        }
    }

    /// Storage backend, catalog and retry policy from configuration.
    /// Routing is wired separately with [`AppBuilder::graphhopper`].
    pub fn from_config(config: &AthisConfig) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn DemandStore> = match config.storage.backend {
            StorageBackend::File => Arc::new(JsonFileDemandStore::new(&config.storage.path)),
            StorageBackend::Memory => Arc::new(InMemoryDemandStore::new()),
        };
        Ok(Self::new()
            .store(store)
            .catalog(config.area_catalog()?)
            .retry(config.retry_policy()))
    }

    /// Builds the GraphHopper client now; a missing api key fails here.
    pub fn graphhopper(self, config: &AthisConfig) -> Result<Self> {
        let client = GraphHopperClient::new(config.routing_settings())?;
        Ok(self.route_provider(Arc::new(client)))
    }

    pub fn store(mut self, store: Arc<dyn DemandStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn route_provider(mut self, routes: Arc<dyn RouteProvider>) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn catalog(mut self, catalog: AreaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<AthisApi> {
        let Some(store) = self.store else {
            return Err(AthisError::configuration(
                "missing component: demand store. Call AppBuilder::store before build()",
            ));
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        let events = self.events.unwrap_or_else(|| Arc::new(TracingEventSink));

        let router = match self.routes {
            Some(routes) => AreaPriorityRouter::new(self.catalog, routes),
            None => {
                tracing::debug!("no routing provider wired; plan_route is disabled");
                AreaPriorityRouter::without_routes(self.catalog)
            }
        };
        let lifecycle = DemandLifecycleManager::new(store, ids, clock, events);
        Ok(AthisApi::new(lifecycle, router, self.retry))
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
