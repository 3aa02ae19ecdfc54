//! End-to-end tests: an in-process relay on an ephemeral port driven by real WebSocket clients.

use std::{net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use roomrelay_server::{config::RelayConfig, domain::RoomId, ui::Server};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::oneshot,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Helper struct to manage an in-process server's lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_heartbeat(Duration::from_secs(30)).await
    }

    async fn start_with_heartbeat(heartbeat_interval: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = RelayConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            heartbeat_interval,
            join_settle_delay: Duration::ZERO,
            global_room: RoomId::try_from("global").unwrap(),
        };

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(Server::in_memory(config).serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
        }
    }

    async fn connect(&self) -> Client {
        let (client, _) = connect_async(format!("ws://{}/ws", self.addr)).await.unwrap();
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn send(client: &mut Client, envelope: Value) {
    client
        .send(Message::Text(envelope.to_string().into()))
        .await
        .unwrap();
}

/// Next text envelope, skipping control frames.
async fn recv(client: &mut Client) -> Value {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return serde_json::from_str(text.as_str()).unwrap(),
                Some(Ok(_)) => continue,
                other => panic!("connection ended: {other:?}"),
            }
        }
    })
    .await
    .expect("timed out waiting for an envelope")
}

/// Assert no text envelope arrives within `wait`.
async fn assert_silent(client: &mut Client, wait: Duration) {
    let result = tokio::time::timeout(wait, async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text.to_string(),
                Some(Ok(_)) => continue,
                _ => std::future::pending::<()>().await,
            }
        }
    })
    .await;
    assert!(result.is_err(), "unexpected envelope: {result:?}");
}

async fn join(client: &mut Client, chat_id: &str, user_id: &str, username: &str) {
    send(
        client,
        json!({"type": "join_chat", "chatId": chat_id, "userId": user_id, "username": username}),
    )
    .await;
    let ack = recv(client).await;
    assert_eq!(ack["type"], "join_success");
    assert_eq!(ack["chatId"], chat_id);
}

#[tokio::test]
async fn test_chat_scenario() {
    // テスト項目: 参加・メッセージ・入力中・切断の一連の流れが正しく配信される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut alice, "r1", "u1", "Alice").await;
    join(&mut bob, "r1", "u2", "Bob").await;

    let joined = recv(&mut alice).await;
    assert_eq!(joined["type"], "user_joined");
    assert_eq!(joined["userId"], "u2");
    assert_eq!(
        joined["activeUsers"],
        json!([{"userId": "u1", "username": "Alice"}, {"userId": "u2", "username": "Bob"}])
    );

    // when (操作): Alice がメッセージを送る
    send(
        &mut alice,
        json!({"type": "chat_message", "chatId": "r1", "text": "hi", "sender": "u1"}),
    )
    .await;

    // then (期待する結果): 送信者を含む両者に同じ messageId で届く
    let to_alice = recv(&mut alice).await;
    let to_bob = recv(&mut bob).await;
    for message in [&to_alice, &to_bob] {
        assert_eq!(message["type"], "new_message");
        assert_eq!(message["content"], "hi");
        assert_eq!(message["sender"], "u1");
        assert_eq!(message["chatId"], "r1");
        assert_eq!(message["username"], "Alice");
        assert!(!message["messageId"].as_str().unwrap().is_empty());
        assert!(message["timestamp"].as_str().unwrap().ends_with('Z'));
    }
    assert_eq!(to_alice["messageId"], to_bob["messageId"]);

    // when (操作): Bob が入力中になる
    send(
        &mut bob,
        json!({"type": "typing_status", "chatId": "r1", "userId": "u2", "isTyping": true}),
    )
    .await;

    // then (期待する結果): Alice には届き、Bob には届かない
    let typing = recv(&mut alice).await;
    assert_eq!(typing["type"], "typing_status");
    assert_eq!(typing["userId"], "u2");
    assert_eq!(typing["isTyping"], true);
    assert_silent(&mut bob, Duration::from_millis(200)).await;

    // when (操作): Bob が切断する
    bob.close(None).await.unwrap();
    drop(bob);

    // then (期待する結果): Alice に user_left が届く
    let left = recv(&mut alice).await;
    assert_eq!(left["type"], "user_left");
    assert_eq!(left["userId"], "u2");
    assert_eq!(
        left["activeUsers"],
        json!([{"userId": "u1", "username": "Alice"}])
    );
    assert_silent(&mut alice, Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_implicit_join_by_first_message() {
    // テスト項目: join なしの最初のメッセージで参加が成立し、続く入力中ステータスが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut bob, "r1", "u2", "Bob").await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "chat_message", "chatId": "r1", "text": "hello", "sender": "u1", "username": "Alice"}),
    )
    .await;

    // then (期待する結果): Alice には join_success ではなく new_message が届く
    let first = recv(&mut alice).await;
    assert_eq!(first["type"], "new_message");

    let joined = recv(&mut bob).await;
    assert_eq!(joined["type"], "user_joined");
    assert_eq!(joined["userId"], "u1");
    let message = recv(&mut bob).await;
    assert_eq!(message["type"], "new_message");
    assert_eq!(message["content"], "hello");

    send(
        &mut alice,
        json!({"type": "typing_status", "chatId": "r1", "userId": "u1", "isTyping": true}),
    )
    .await;
    let typing = recv(&mut bob).await;
    assert_eq!(typing["type"], "typing_status");
    assert_eq!(typing["username"], "Alice");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    // テスト項目: 別ルームのメッセージは届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut carol = server.connect().await;
    join(&mut alice, "r1", "u1", "Alice").await;
    join(&mut carol, "r2", "u3", "Carol").await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "chat_message", "chatId": "r1", "text": "r1 only", "sender": "u1"}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(recv(&mut alice).await["type"], "new_message");
    assert_silent(&mut carol, Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_read_receipt_reaches_sender_too() {
    // テスト項目: 既読通知は送信者を含むルーム全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut alice, "r1", "u1", "Alice").await;
    join(&mut bob, "r1", "u2", "Bob").await;
    recv(&mut alice).await;

    // when (操作):
    send(
        &mut bob,
        json!({"type": "message_read", "chatId": "r1", "messageId": "m1", "userId": "u2"}),
    )
    .await;

    // then (期待する結果):
    for client in [&mut alice, &mut bob] {
        let read = recv(client).await;
        assert_eq!(read["type"], "message_read");
        assert_eq!(read["messageId"], "m1");
        assert_eq!(read["userId"], "u2");
    }
}

#[tokio::test]
async fn test_malformed_and_unknown_envelopes_are_dropped() {
    // テスト項目: 不正な JSON や未知の type は破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;

    // when (操作):
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    send(&mut alice, json!({"type": "bogus", "chatId": "r1"})).await;
    send(&mut alice, json!({"type": "join_chat", "chatId": "r1"})).await;

    // then (期待する結果): 後続の正しいエンベロープは処理される
    join(&mut alice, "r1", "u1", "Alice").await;
}

#[tokio::test]
async fn test_clear_chat_only_in_global_room() {
    // テスト項目: 消去通知はグローバルルームでのみ他の参加者に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut alice, "global", "u1", "Alice").await;
    join(&mut bob, "global", "u2", "Bob").await;
    recv(&mut alice).await;

    // when (操作):
    send(
        &mut alice,
        json!({"type": "broadcast_clear_chat", "chatId": "global"}),
    )
    .await;

    // then (期待する結果):
    let cleared = recv(&mut bob).await;
    assert_eq!(cleared["type"], "global_chat_cleared");
    assert_eq!(cleared["clearedBy"], "Alice");
    assert_silent(&mut alice, Duration::from_millis(200)).await;
}

#[tokio::test]
async fn test_unresponsive_connection_is_evicted() {
    // テスト項目: ping に応答しない接続は強制切断され、ルームに user_left が届く
    // given (前提条件):
    let server = TestServer::start_with_heartbeat(Duration::from_millis(300)).await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut alice, "r1", "u1", "Alice").await;
    join(&mut bob, "r1", "u2", "Bob").await;
    recv(&mut alice).await;

    // when (操作): Bob は以降ソケットを読まないため pong を返さない
    // then (期待する結果): Alice は読み続けているので切断されず、Bob の退出を受け取る
    let left = recv(&mut alice).await;
    assert_eq!(left["type"], "user_left");
    assert_eq!(left["userId"], "u2");

    // then (期待する結果): Close フレームで受信ループが終わっても user_left は 1 回だけ
    assert_silent(&mut alice, Duration::from_millis(1000)).await;
    drop(bob);
}

#[tokio::test]
async fn test_dropped_transport_announces_departure_once() {
    // テスト項目: クローズハンドシェイクなしでソケットが落ちても user_left が 1 回だけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join(&mut alice, "r1", "u1", "Alice").await;
    join(&mut bob, "r1", "u2", "Bob").await;
    recv(&mut alice).await;

    // when (操作): Close フレームを送らずに TCP 接続ごと破棄する
    drop(bob);

    // then (期待する結果):
    let left = recv(&mut alice).await;
    assert_eq!(left["type"], "user_left");
    assert_eq!(left["userId"], "u2");
    assert_eq!(
        left["activeUsers"],
        json!([{"userId": "u1", "username": "Alice"}])
    );
    assert_silent(&mut alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(format!("http://{}/api/health", server.addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}
