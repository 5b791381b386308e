//! AreaPriorityRouter - 介入エリアの優先順位付けと経路計算の委譲
//!
//! 並べ替えは純粋関数（I/O なし）。経路の形状計算は `RouteProvider` に任せます。

use std::cmp::Reverse;
use std::sync::Arc;

use crate::domain::{Area, AreaCatalog, AthisError, GeoPoint, Result, RouteResult};
use crate::ports::RouteProvider;

/// Stable sort by descending priority weight; equal weights keep input order.
pub fn rank_areas(areas: &[Area]) -> Vec<Area> {
    let mut ranked = areas.to_vec();
    // slice::sort_by_key is stable
    ranked.sort_by_key(|area| Reverse(area.priority.weight()));
    ranked
}

/// Order in which field teams should visit areas.
///
/// Currently identical to [`rank_areas`]. Distance-weighted reordering would
/// plug in here without changing callers.
pub fn plan_visit_order(areas: &[Area]) -> Vec<Area> {
    rank_areas(areas)
}

pub struct AreaPriorityRouter {
    catalog: AreaCatalog,
    routes: Option<Arc<dyn RouteProvider>>,
}

impl AreaPriorityRouter {
    pub fn new(catalog: AreaCatalog, routes: Arc<dyn RouteProvider>) -> Self {
        Self {
            catalog,
            routes: Some(routes),
        }
    }

    /// Ranking only. `compute_route` fails with `Configuration`.
    pub fn without_routes(catalog: AreaCatalog) -> Self {
        Self {
            catalog,
            routes: None,
        }
    }

    pub fn has_routes(&self) -> bool {
        self.routes.is_some()
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.catalog
    }

    /// The whole catalog, ranked.
    pub fn ranked_catalog(&self) -> Vec<Area> {
        rank_areas(self.catalog.areas())
    }

    pub fn plan_visit_order(&self) -> Vec<Area> {
        plan_visit_order(self.catalog.areas())
    }

    /// One call to the routing provider; no retry here.
    pub async fn compute_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult> {
        let Some(routes) = &self.routes else {
            return Err(AthisError::configuration("no routing provider configured"));
        };
        routes.compute_route(start, end).await
    }
}
