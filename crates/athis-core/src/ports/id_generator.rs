//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::DemandId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は Demand の id を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数のリクエストから同時に使える）
pub trait IdGenerator: Send + Sync {
    fn generate_demand_id(&self) -> DemandId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock の時刻（ミリ秒）と 80 bit の乱数から ULID を作ります。
/// FixedClock を使うと timestamp 部分が決定的になります。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_demand_id(&self) -> DemandId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        DemandId::from(ulid)
    }
}
