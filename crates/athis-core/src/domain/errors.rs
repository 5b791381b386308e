//! Errors - エラー型と分類
//!
//! すべての公開操作は `AthisError` を返します。
//! `ErrorClass` は表示層向けの運用分類です（入力ミスか、一時的な障害か）。

use thiserror::Error;

use super::status::DemandStatus;

/// ErrorClass は `AthisError` の運用分類
///
/// - InvalidInput: 呼び出し側が入力を直せば成功する
/// - NotFound: 指定された id が存在しない
/// - Conflict: 現在の状態では許可されない操作
/// - Unavailable: 一時的な障害（バックオフ付きで再試行可）
/// - Fatal: 起動時の設定ミス（再試行無意味）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    InvalidInput,
    NotFound,
    Conflict,
    Unavailable,
    Fatal,
}

#[derive(Debug, Error)]
pub enum AthisError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: DemandStatus, to: DemandStatus },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("routing provider unavailable: {message}")]
    RoutingUnavailable { message: String },

    #[error("invalid routing request: {message}")]
    InvalidRequest { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl AthisError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn routing_unavailable(message: impl Into<String>) -> Self {
        Self::RoutingUnavailable {
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation { .. } | Self::InvalidRequest { .. } => ErrorClass::InvalidInput,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::InvalidTransition { .. } => ErrorClass::Conflict,
            Self::RoutingUnavailable { .. } | Self::Storage { .. } => ErrorClass::Unavailable,
            Self::Configuration { .. } => ErrorClass::Fatal,
        }
    }

    /// 再試行して意味があるか
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Unavailable
    }
}

impl From<std::io::Error> for AthisError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AthisError>;
