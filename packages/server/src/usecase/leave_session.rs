//! UseCase: セッション退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveSessionUseCase::execute() メソッド
//! - レジストリからの削除と退出アナウンス
//!
//! ### なぜこのテストが必要か
//! - 切断経路（exit / EOF / エラー）に関わらず、削除とアナウンスは 1 回だけ
//! - 退出アナウンスは除外なしで残りの全員に届く
//!
//! ### どのような状況を想定しているか
//! - 正常系：名乗り済みセッションの退出
//! - エッジケース：最後のセッションの退出、名乗る前の切断
//! - 異常系：二重の退出処理

use std::sync::Arc;

use crate::domain::{ChatEvent, SessionId, SessionRegistry, Username};

/// 退出処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 名乗り済みセッションが退出し、残りに通知した
    Announced { username: Username, notified: usize },
    /// 名乗る前に切断したため通知していない
    Silent,
    /// 既に退出処理済み
    AlreadyGone,
}

/// セッション退出のユースケース
pub struct LeaveSessionUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 退出を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 退出するセッションの ID
    ///
    /// # Returns
    ///
    /// 退出処理の結果（`LeaveOutcome`）
    pub async fn execute(&self, id: SessionId) -> LeaveOutcome {
        // 1. Registry から削除（2 回目以降は None）
        let Some(removed) = self.registry.remove(id).await else {
            return LeaveOutcome::AlreadyGone;
        };

        // 2. 名乗り済みなら残りの全員に通知（本人は既に配送対象外）
        match removed.username {
            Some(username) => {
                let notified = self
                    .registry
                    .broadcast(ChatEvent::left(username.clone()), None)
                    .await;
                LeaveOutcome::Announced { username, notified }
            }
            None => LeaveOutcome::Silent,
        }
    }
}
