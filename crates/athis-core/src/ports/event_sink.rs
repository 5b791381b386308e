//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - TracingEventSink: tracing へ出力（デフォルト）
//! - RecordingEventSink: メモリに保持（テスト・開発用）

use crate::domain::DemandEvent;

/// EventSink はドメインイベントを記録
///
/// 送信はベストエフォートで、失敗しても Lifecycle の操作は失敗させません。
/// そのため戻り値を持ちません。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: DemandEvent);
}
