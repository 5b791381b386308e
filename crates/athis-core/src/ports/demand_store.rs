//! DemandStore port - Demand の永続化（Storage Port）
//!
//! ファイル、組み込み DB、ネットワーク DB などで実装します。
//! Lifecycle Manager はこの trait 以外の永続化の詳細を知りません。

use async_trait::async_trait;

use crate::domain::{Demand, DemandId, Result};

/// DemandStore は Demand レコードの保存先
///
/// # 前提
/// - 同一プロセス内では「最後の書き込みが次の読み込みで見える」ことだけを仮定
/// - 書き込みの排他制御は呼び出し側（Lifecycle Manager）の責任
/// - `load_all` は挿入順（古い順）で返す
#[async_trait]
pub trait DemandStore: Send + Sync {
    /// 新規作成・上書きの両方に使う（id が同じなら置き換え、順序は維持）
    async fn save(&self, demand: &Demand) -> Result<()>;

    async fn load(&self, id: DemandId) -> Result<Option<Demand>>;

    async fn load_all(&self) -> Result<Vec<Demand>>;
}
