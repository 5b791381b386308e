//! athis-core
//!
//! Core building blocks for Athis: housing-assistance demands and their
//! review lifecycle, plus the priority ordering of intervention areas.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, geo, area, demand, status, route, errors, events）
//! - **ports**: 抽象化レイヤー（DemandStore, RouteProvider, Clock, IdGenerator, EventSink）
//! - **impls**: 実装（InMemory / JSON ファイルストア、GraphHopper クライアント、イベント出力）
//! - **app**: ユースケース（lifecycle, priority_router, retry, stats, api, builder）
//! - **config**: TOML 設定
//! - **observability**: tracing の初期化

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{AppBuilder, AthisApi};
pub use config::AthisConfig;
pub use domain::{AthisError, ErrorClass, Result};
