//! UseCase 層
//!
//! セッションのライフサイクル（登録・名乗り・中継・退出）を実装するレイヤー。
//! UI 層から呼び出され、Domain 層の SessionRegistry を操作します。

pub mod connect_session;
pub mod error;
pub mod join_session;
pub mod leave_session;
pub mod relay_message;

pub use connect_session::ConnectSessionUseCase;
pub use error::{ConnectError, JoinError};
pub use join_session::JoinSessionUseCase;
pub use leave_session::{LeaveOutcome, LeaveSessionUseCase};
pub use relay_message::RelayMessageUseCase;
