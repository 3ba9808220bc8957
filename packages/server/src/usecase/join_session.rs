//! UseCase: 名乗り（ハンドシェイク完了）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - 名前の記録と参加アナウンスのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 参加アナウンスは本人以外の全員に 1 回ずつ届く必要がある
//! - 名前の重複や空文字列を拒否しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：他のセッションがいる状態での参加
//! - エッジケース：自分しかいない状態での参加、空の名前
//! - 異常系：名乗る前にレジストリから外れていた

use std::sync::Arc;

use crate::domain::{ChatEvent, SessionId, SessionRegistry, Username};

use super::error::JoinError;

/// 名乗りのユースケース
pub struct JoinSessionUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 名乗りを実行
    ///
    /// # Arguments
    ///
    /// * `id` - 名乗るセッションの ID
    /// * `username` - 受け取った名前（検証しない）
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - 参加アナウンスを配送したセッション数
    /// * `Err(JoinError)` - セッションが既に登録されていない
    pub async fn execute(&self, id: SessionId, username: Username) -> Result<usize, JoinError> {
        // 1. Registry に名前を記録
        self.registry
            .assign_username(id, username.clone())
            .await
            .map_err(|_| JoinError::SessionGone(id))?;

        // 2. 本人以外に参加をアナウンス
        let notified = self
            .registry
            .broadcast(ChatEvent::joined(username), Some(id))
            .await;

        Ok(notified)
    }
}
