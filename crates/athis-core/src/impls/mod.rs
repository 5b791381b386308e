//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryDemandStore**: 開発・テスト用の正本
//! - **JsonFileDemandStore**: キー付き JSON blob をファイルに保存
//! - **GraphHopperClient**: GraphHopper Routing API の HTTP アダプタ
//! - **TracingEventSink / RecordingEventSink**: ドメインイベントの出力先

pub mod event_sinks;
pub mod file_store;
pub mod graphhopper;
pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::event_sinks::{RecordingEventSink, TracingEventSink};
pub use self::file_store::JsonFileDemandStore;
pub use self::graphhopper::{GraphHopperClient, GraphHopperSettings};
pub use self::inmem_store::InMemoryDemandStore;
