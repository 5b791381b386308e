//! App - ユースケース層
//!
//! ports の trait オブジェクトを組み合わせて、呼び出し側に公開する操作を提供します。

pub mod api;
pub mod builder;
pub mod lifecycle;
pub mod priority_router;
pub mod retry;
pub mod stats;

pub use self::api::AthisApi;
pub use self::builder::AppBuilder;
pub use self::lifecycle::{DemandLifecycleManager, ListOrder, ListQuery};
pub use self::priority_router::{AreaPriorityRouter, plan_visit_order, rank_areas};
pub use self::retry::RetryPolicy;
pub use self::stats::DemandStats;
