//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（ファイル、データベース、ルーティング API など）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! 協調オブジェクトはすべてコンストラクタ引数で注入します。グローバル状態は持ちません。

pub mod clock;
pub mod demand_store;
pub mod event_sink;
pub mod id_generator;
pub mod route_provider;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::demand_store::DemandStore;
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::route_provider::RouteProvider;
