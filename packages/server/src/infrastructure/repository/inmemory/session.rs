//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! HashMap をインメモリの接続表として使用し、ブロードキャストもここで行います。
//!
//! ## 配送の方式
//!
//! 宛先一覧はロックを取った状態でスナップショットし、ロックを解放してから
//! 各セッションの送信キューに `try_send` で積みます。
//! キューが満杯の宛先にはそのメッセージを配送しません（他の宛先は待たされない）。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{
    Mutex,
    mpsc::{self, error::TrySendError},
};

use crate::domain::{
    ChatEvent, RegistryError, SessionEntry, SessionId, SessionRegistry, SessionSnapshot, Username,
};

/// インメモリ Session Registry 実装
///
/// ドメイン層の SessionRegistry trait を実装します（依存性の逆転）。
#[derive(Default)]
pub struct InMemorySessionRegistry {
    /// 接続中のセッション（送信キューを含む）
    sessions: Mutex<HashMap<SessionId, SessionEntry>>,
}

impl InMemorySessionRegistry {
    /// 空の InMemorySessionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 宛先のスナップショットを取得（ロック内で完結させる）
    async fn recipients(&self, exclude: Option<SessionId>) -> Vec<(SessionId, mpsc::Sender<String>)> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|entry| Some(entry.id) != exclude)
            .map(|entry| (entry.id, entry.sender.clone()))
            .collect()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn add(&self, entry: SessionEntry) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&entry.id) {
            return Err(RegistryError::AlreadyRegistered(entry.id));
        }
        tracing::debug!(session_id = %entry.id, peer = %entry.peer, "session registered");
        sessions.insert(entry.id, entry);
        Ok(())
    }

    async fn assign_username(
        &self,
        id: SessionId,
        username: Username,
    ) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or(RegistryError::NotRegistered(id))?;
        entry.username = Some(username);
        Ok(())
    }

    async fn remove(&self, id: SessionId) -> Option<SessionSnapshot> {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(&id).map(|entry| entry.snapshot());
        if removed.is_some() {
            tracing::debug!(session_id = %id, remaining = sessions.len(), "session removed");
        }
        removed
    }

    async fn broadcast(&self, event: ChatEvent, exclude: Option<SessionId>) -> usize {
        let line = event.render();
        let recipients = self.recipients(exclude).await;

        let mut delivered = 0;
        for (id, sender) in recipients {
            match sender.try_send(line.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(session_id = %id, "Outbound queue full, dropping message");
                }
                Err(TrySendError::Closed(_)) => {
                    // The session is tearing down and will leave the registry shortly.
                    tracing::debug!(session_id = %id, "Outbound queue closed, skipping");
                }
            }
        }

        tracing::trace!(delivered, line = %line, "broadcast");
        delivered
    }

    async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn active_count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.values().filter(|e| e.username.is_some()).count()
    }

    async fn snapshot(&self) -> Vec<SessionSnapshot> {
        let sessions = self.sessions.lock().await;
        sessions.values().map(SessionEntry::snapshot).collect()
    }
}
