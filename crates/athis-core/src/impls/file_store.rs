//! JsonFileDemandStore - キー付き JSON blob による DemandStore
//!
//! ファイル全体が 1 つの JSON オブジェクトで、`"athis-demandas"` キーに
//! Demand の配列（挿入順）を保持します。
//!
//! ```json
//! { "athis-demandas": [ { "id": "demand-01J...", "status": "pending", ... } ] }
//! ```
//!
//! 互換性があるのはキー構成のみです。レコード自体は `Demand` の serde 形式
//! （camelCase、英語の値）で、ポルトガル語フィールド（`tipo`, `descricao`, `"pendente"` など）
//! の旧レコードは読めず `Storage` エラーになります。
//!
//! # 実装詳細
//! - 書き込みは毎回 blob 全体を一時ファイルに書いてから rename
//! - 読み書きは内部の Mutex で直列化（異なる id の save 同士でも blob を壊さない）

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{AthisError, Demand, DemandId, Result};
use crate::ports::DemandStore;

pub const DEMANDS_KEY: &str = "athis-demandas";

pub struct JsonFileDemandStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileDemandStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_blob(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            AthisError::storage(format!("corrupt blob at {}: {e}", self.path.display()))
        })
    }

    async fn read_demands(&self) -> Result<(BTreeMap<String, serde_json::Value>, Vec<Demand>)> {
        let mut blob = self.read_blob().await?;
        let demands = match blob.remove(DEMANDS_KEY) {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                AthisError::storage(format!(
                    "corrupt '{DEMANDS_KEY}' entry at {}: {e}",
                    self.path.display()
                ))
            })?,
            None => Vec::new(),
        };
        Ok((blob, demands))
    }

    async fn write_demands(
        &self,
        mut blob: BTreeMap<String, serde_json::Value>,
        demands: &[Demand],
    ) -> Result<()> {
        let value = serde_json::to_value(demands)
            .map_err(|e| AthisError::storage(format!("serialize demands: {e}")))?;
        blob.insert(DEMANDS_KEY.to_string(), value);
        let bytes = serde_json::to_vec_pretty(&blob)
            .map_err(|e| AthisError::storage(format!("serialize blob: {e}")))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DemandStore for JsonFileDemandStore {
    async fn save(&self, demand: &Demand) -> Result<()> {
        let _guard = self.lock.lock().await;
        let (blob, mut demands) = self.read_demands().await?;
        match demands.iter_mut().find(|d| d.id() == demand.id()) {
            Some(existing) => *existing = demand.clone(),
            None => demands.push(demand.clone()),
        }
        self.write_demands(blob, &demands).await?;
        tracing::debug!(demand_id = %demand.id(), path = %self.path.display(), "demand written");
        Ok(())
    }

    async fn load(&self, id: DemandId) -> Result<Option<Demand>> {
        let _guard = self.lock.lock().await;
        let (_, demands) = self.read_demands().await?;
        Ok(demands.into_iter().find(|d| d.id() == id))
    }

    async fn load_all(&self) -> Result<Vec<Demand>> {
        let _guard = self.lock.lock().await;
        let (_, demands) = self.read_demands().await?;
        Ok(demands)
    }
}
