//! Domain identifiers.
//!
//! # ULID ベースの ID
//! Demand の id は ULID (Universally Unique Lexicographically Sortable Identifier) です。
//!
//! - **時刻でソート可能**: timestamp が先頭にあるため、生成順序でソートできる
//! - **調整不要**: プロセス内で採番カウンタを共有しなくても衝突しない
//!
//! 表示形式は `demand-<ULID>`。パース時はプレフィックスなしの ULID も受け付けます。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

use super::errors::AthisError;

const PREFIX: &str = "demand-";

/// Identifier of a Demand.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DemandId {
    ulid: Ulid,
}

impl DemandId {
    /// ULID から DemandId を作成
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self { ulid }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl From<Ulid> for DemandId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for DemandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.ulid)
    }
}

impl FromStr for DemandId {
    type Err = AthisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_prefix(PREFIX).unwrap_or(raw);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|e| AthisError::validation(format!("invalid demand id '{s}': {e}")))
    }
}

impl TryFrom<String> for DemandId {
    type Error = AthisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DemandId> for String {
    fn from(id: DemandId) -> Self {
        id.to_string()
    }
}
