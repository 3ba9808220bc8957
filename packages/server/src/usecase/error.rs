//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::SessionId;

/// セッション登録時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 同じ SessionId が既に登録されている
    #[error("Session '{0}' is already connected")]
    DuplicateSession(SessionId),
}

/// ハンドシェイク（名乗り）時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// 名乗る前にレジストリから外れていた
    #[error("Session '{0}' is no longer registered")]
    SessionGone(SessionId),
}
