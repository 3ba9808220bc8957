//! UseCase: セッション登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - 接続直後（名乗る前）のセッションをレジストリに登録する処理
//!
//! ### なぜこのテストが必要か
//! - 登録されたセッションだけがブロードキャストの配送対象になる
//! - 名乗る前のセッションもアナウンスを受け取れることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規セッションの登録
//! - 異常系：同じ SessionId の二重登録

use std::sync::Arc;

use crate::domain::{RegistryError, SessionEntry, SessionRegistry};

use super::error::ConnectError;

/// セッション登録のユースケース
pub struct ConnectSessionUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// セッション登録を実行
    ///
    /// # Arguments
    ///
    /// * `entry` - 登録するセッション（送信キューを含む）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 登録成功
    /// * `Err(ConnectError)` - 登録失敗
    pub async fn execute(&self, entry: SessionEntry) -> Result<(), ConnectError> {
        self.registry.add(entry).await.map_err(|err| match err {
            RegistryError::AlreadyRegistered(id) | RegistryError::NotRegistered(id) => {
                ConnectError::DuplicateSession(id)
            }
        })
    }
}
