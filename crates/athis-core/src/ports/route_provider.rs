//! RouteProvider port - 外部ルーティングサービス
//!
//! # 実装
//! - **GraphHopperClient**: GraphHopper Routing API（HTTP）

use async_trait::async_trait;

use crate::domain::{GeoPoint, Result, RouteResult};

/// RouteProvider は 2 点間の経路を計算
///
/// # 契約
/// - 範囲外の座標は通信前に `InvalidRequest` で失敗
/// - 到達不能・非 2xx・不正なレスポンス・タイムアウトは `RoutingUnavailable`
/// - 内部で再試行はしない（再試行は呼び出し側の方針）
/// - 部分的な結果は返さない
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn compute_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult>;
}
