//! AthisApi - 呼び出し側（CLI / HTTP など）に公開する操作
//!
//! 各メソッドはコアのメソッドに 1:1 で対応し、同じエラー種別をそのまま返します。
//! 文字列の id は境界でパースし、パースできない id は `NotFound` として扱います。

use crate::app::lifecycle::{DemandLifecycleManager, ListQuery};
use crate::app::priority_router::AreaPriorityRouter;
use crate::app::retry::RetryPolicy;
use crate::app::stats::DemandStats;
use crate::domain::{
    Area, AreaCatalog, AthisError, Demand, DemandId, DemandStatus, GeoPoint, NewDemand, Result,
    RouteResult,
};

pub struct AthisApi {
    lifecycle: DemandLifecycleManager,
    router: AreaPriorityRouter,
    retry: RetryPolicy,
}

impl AthisApi {
    pub fn new(
        lifecycle: DemandLifecycleManager,
        router: AreaPriorityRouter,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            lifecycle,
            router,
            retry,
        }
    }

    pub fn catalog(&self) -> &AreaCatalog {
        self.router.catalog()
    }

    pub async fn create_demand(&self, input: NewDemand) -> Result<Demand> {
        self.lifecycle.create(input).await
    }

    pub async fn list_demands(&self, status: Option<DemandStatus>) -> Result<Vec<Demand>> {
        self.list_demands_with(ListQuery {
            status,
            ..ListQuery::default()
        })
        .await
    }

    pub async fn list_demands_with(&self, query: ListQuery) -> Result<Vec<Demand>> {
        self.lifecycle.list(query).await
    }

    pub async fn get_demand(&self, id: &str) -> Result<Demand> {
        let id = parse_id(id)?;
        self.lifecycle.get(id).await
    }

    pub async fn set_demand_status(&self, id: &str, status: DemandStatus) -> Result<Demand> {
        let id = parse_id(id)?;
        self.lifecycle.transition(id, status).await
    }

    pub fn rank_areas(&self) -> Vec<Area> {
        self.router.ranked_catalog()
    }

    pub fn plan_visit_order(&self) -> Vec<Area> {
        self.router.plan_visit_order()
    }

    /// Retries transient routing failures per the configured policy.
    /// No lifecycle lock is held here.
    pub async fn plan_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult> {
        tracing::debug!(%start, %end, max_attempts = self.retry.max_attempts, "planning route");
        self.retry
            .run(|| self.router.compute_route(start, end))
            .await
    }

    pub async fn demand_stats(&self) -> Result<DemandStats> {
        self.lifecycle.stats().await
    }

    /// Demands whose location falls inside the area boundary, oldest first.
    pub async fn demands_in_area(&self, area_id: &str) -> Result<Vec<Demand>> {
        let area = self
            .catalog()
            .get(area_id)
            .ok_or_else(|| AthisError::not_found("area", area_id))?;
        let demands = self.lifecycle.list(ListQuery::all()).await?;
        Ok(demands
            .into_iter()
            .filter(|d| area.contains(&d.location()))
            .collect())
    }
}

fn parse_id(raw: &str) -> Result<DemandId> {
    raw.parse()
        .map_err(|_| AthisError::not_found("demand", raw))
}
