//! UseCase: チャットメッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - `<name>: <line>` 形式への整形と送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者自身には自分のメッセージが届かないことを保証
//! - 各宛先にちょうど 1 回ずつ届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数の宛先への中継
//! - エッジケース：送信者しかいない場合（宛先なし）、空行

use std::sync::Arc;

use crate::domain::{ChatEvent, SessionId, SessionRegistry, Username};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Registry（セッション管理の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl RelayMessageUseCase {
    /// 新しい RelayMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// メッセージ中継を実行
    ///
    /// # Arguments
    ///
    /// * `from_id` - 送信者のセッション ID（配送対象から除外）
    /// * `from` - 送信者の名前
    /// * `body` - 受信した 1 行（そのまま中継する）
    ///
    /// # Returns
    ///
    /// 配送したセッション数
    pub async fn execute(&self, from_id: SessionId, from: &Username, body: &str) -> usize {
        let event = ChatEvent::chat(from.clone(), body);
        self.registry.broadcast(event, Some(from_id)).await
    }
}
