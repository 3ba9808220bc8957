//! Chat relay integration tests.
//!
//! Drive a real server over TCP and check the wire contract: prompt,
//! join/chat/leave lines, exclusion of the sender, and registry cleanup.

mod fixtures;

use std::collections::HashSet;

use fixtures::{PROMPT, TestClient, TestServer};
use tsudoi_server::{Server, ServerConfig, ServerError};

#[tokio::test]
async fn test_alice_and_bob_scenario() {
    // テスト項目: alice と bob が順に接続し、alice の発言が bob にだけ届く
    // given (前提条件): 2 人とも名乗る前に接続している
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    // when (操作):
    alice.send_line("alice").await;
    bob.expect_line("alice has joined the chat!").await;
    bob.send_line("bob").await;
    alice.expect_line("bob has joined the chat!").await;
    alice.send_line("hi").await;

    // then (期待する結果):
    bob.expect_line("alice: hi").await;
    alice.expect_silence().await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn test_each_client_sees_joins_of_others_only() {
    // テスト項目: N 人が参加すると、各自が他人の参加アナウンスを N-1 回受け取る
    // given (前提条件): 全員が名乗る前に接続
    let server = TestServer::start().await;
    let names = ["c0", "c1", "c2", "c3"];
    let mut clients = Vec::new();
    for _ in names {
        clients.push(server.connect().await);
    }

    // when (操作): 1 人ずつ名乗る
    for (i, name) in names.iter().enumerate() {
        clients[i].send_line(name).await;
        server.wait_for_active(i + 1).await;
    }

    // then (期待する結果):
    for (i, client) in clients.iter_mut().enumerate() {
        let mut seen = HashSet::new();
        for _ in 0..names.len() - 1 {
            seen.insert(client.read_line().await.expect("missing join line"));
        }
        let expected: HashSet<String> = names
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, name)| format!("{name} has joined the chat!"))
            .collect();
        assert_eq!(seen, expected);
        client.expect_silence().await;
    }
}

#[tokio::test]
async fn test_chat_line_reaches_every_peer_once() {
    // テスト項目: 発言は M 人の他の参加者に 1 回ずつ届き、本人には届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("alice").await;
    let mut bob = server.join("bob").await;
    alice.expect_line("bob has joined the chat!").await;
    let mut carol = server.join("carol").await;
    alice.expect_line("carol has joined the chat!").await;
    bob.expect_line("carol has joined the chat!").await;

    // when (操作):
    alice.send_line("hello everyone").await;
    alice.send_line("second line").await;

    // then (期待する結果): 宛先ごとに送信順で届く
    for peer in [&mut bob, &mut carol] {
        peer.expect_line("alice: hello everyone").await;
        peer.expect_line("alice: second line").await;
        peer.expect_silence().await;
    }
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_exit_in_any_case_announces_leave_once() {
    // テスト項目: exit（大文字小文字問わず）で退出し、残りの全員に 1 回だけ通知される
    for command in ["exit", "Exit", "EXIT"] {
        // given (前提条件):
        let server = TestServer::start().await;
        let mut alice = server.join("alice").await;
        let mut bob = server.join("bob").await;
        alice.expect_line("bob has joined the chat!").await;
        let mut carol = server.join("carol").await;
        alice.expect_line("carol has joined the chat!").await;
        bob.expect_line("carol has joined the chat!").await;

        // when (操作):
        carol.send_line(command).await;

        // then (期待する結果):
        carol.expect_closed().await;
        for peer in [&mut alice, &mut bob] {
            peer.expect_line("carol has left the chat.").await;
            peer.expect_silence().await;
        }
        server.wait_for_active(2).await;
        assert_eq!(server.connected_count().await, 2);
    }
}

#[tokio::test]
async fn test_lines_after_exit_are_not_relayed() {
    // テスト項目: exit の後に送った行は中継されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("alice").await;
    let mut bob = server.join("bob").await;
    alice.expect_line("bob has joined the chat!").await;

    // when (操作): 同じ書き込みで exit と後続の行を送る
    bob.send_line("exit\nstill here?").await;

    // then (期待する結果):
    alice.expect_line("bob has left the chat.").await;
    alice.expect_silence().await;
}

#[tokio::test]
async fn test_abrupt_disconnect_announces_leave_once() {
    // テスト項目: exit を送らずに切断しても退出通知は 1 回、Registry からも 1 回だけ削除
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("alice").await;
    let bob = server.join("bob").await;
    alice.expect_line("bob has joined the chat!").await;

    // when (操作):
    drop(bob);

    // then (期待する結果):
    alice.expect_line("bob has left the chat.").await;
    alice.expect_silence().await;
    server.wait_for_active(1).await;
    assert_eq!(server.connected_count().await, 1);
}

#[tokio::test]
async fn test_disconnect_before_handshake_is_silent() {
    // テスト項目: 名乗る前に切断したクライアントは通知なしで削除される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.join("alice").await;
    let pending = server.connect().await;
    server.wait_for_connected(2).await;

    // when (操作):
    drop(pending);

    // then (期待する結果):
    server.wait_for_connected(1).await;
    alice.expect_silence().await;
    assert_eq!(server.active_count().await, 1);
}

#[tokio::test]
async fn test_pending_client_receives_announcements() {
    // テスト項目: 名乗る前のクライアントもアナウンスとチャットを受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut pending = server.connect().await;
    let mut alice = server.join("alice").await;

    // when (操作):
    alice.send_line("anyone there?").await;

    // then (期待する結果):
    pending.expect_line("alice has joined the chat!").await;
    pending.expect_line("alice: anyone there?").await;
}

#[tokio::test]
async fn test_duplicate_and_empty_usernames_are_accepted() {
    // テスト項目: 同じ名前・空の名前でも参加できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut first = server.join("alice").await;
    let mut second = server.join("alice").await;
    first.expect_line("alice has joined the chat!").await;

    // when (操作):
    let mut nameless = server.join("").await;
    second.send_line("which one am I?").await;

    // then (期待する結果):
    first.expect_line(" has joined the chat!").await;
    first.expect_line("alice: which one am I?").await;
    nameless.expect_line("alice: which one am I?").await;
    assert_eq!(server.active_count().await, 3);
}

#[tokio::test]
async fn test_crlf_line_endings_are_accepted() {
    // テスト項目: CRLF 区切りの行も受け付け、CR は名前や本文に含めない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut bob = server.join("bob").await;
    let mut alice = server.connect().await;

    // when (操作):
    alice.send_line("alice\r").await;
    bob.expect_line("alice has joined the chat!").await;
    alice.send_line("hi\r").await;

    // then (期待する結果):
    bob.expect_line("alice: hi").await;
}

#[tokio::test]
async fn test_idle_timeout_closes_silent_session() {
    // テスト項目: アイドルタイムアウト設定時、無言のセッションは閉じられ退出通知が出る
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        idle_timeout_secs: Some(1),
        ..ServerConfig::ephemeral()
    })
    .await;
    let mut alice = TestClient::connect(server.chat_addr).await;
    alice.expect_line(PROMPT).await;
    alice.send_line("alice").await;
    server.wait_for_active(1).await;
    let mut bob = server.join("bob").await;

    // when (操作): alice は名乗った後、何も送らない
    alice.expect_line("bob has joined the chat!").await;
    bob.send_line("ping").await;
    alice.expect_line("bob: ping").await;

    // then (期待する結果): 受信だけではタイムアウトは延長されない
    alice.expect_closed().await;
    bob.expect_line("alice has left the chat.").await;
}

#[tokio::test]
async fn test_bind_rejects_unusable_config() {
    // テスト項目: コードから組み立てた設定でも、容量 0・タイムアウト 0 秒は起動前に拒否される
    for config in [
        ServerConfig {
            outbound_capacity: 0,
            ..ServerConfig::ephemeral()
        },
        ServerConfig {
            idle_timeout_secs: Some(0),
            ..ServerConfig::ephemeral()
        },
    ] {
        // when (操作):
        let result = Server::bind(config).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
