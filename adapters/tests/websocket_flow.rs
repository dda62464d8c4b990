use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use adapters::{create_app_state, router};
use domain::PairingConfig;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> SocketAddr {
    let app = router(create_app_state(PairingConfig::default()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    client
}

async fn send_join(client: &mut Client) {
    client.send(Message::Text(r#"{"type":"join"}"#.into())).await.unwrap();
}

async fn send_next(client: &mut Client) {
    client.send(Message::Text(r#"{"type":"next"}"#.into())).await.unwrap();
}

async fn recv_json(client: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("timed out waiting for server event")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

fn waiting() -> Value {
    json!({ "event": "waiting", "data": "Waiting for another user to join..." })
}

#[tokio::test]
async fn two_clients_are_paired_into_one_room() {
    let addr = spawn_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;

    send_join(&mut a).await;
    assert_eq!(recv_json(&mut a).await, waiting());

    send_join(&mut b).await;
    let to_a = recv_json(&mut a).await;
    let to_b = recv_json(&mut b).await;

    assert_eq!(to_a["event"], "connect_users");
    assert_eq!(to_a, to_b);
    assert!(to_a["data"]["room"].as_str().unwrap().starts_with("room-"));
}

#[tokio::test]
async fn partner_is_told_and_requeued_when_peer_leaves() {
    let addr = spawn_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;

    send_join(&mut a).await;
    recv_json(&mut a).await;
    send_join(&mut b).await;
    let connect_users = recv_json(&mut b).await;

    a.close(None).await.unwrap();

    let left = recv_json(&mut b).await;
    assert_eq!(left["event"], "partner_left");
    assert_eq!(left["data"]["room"], connect_users["data"]["room"]);
    assert_eq!(recv_json(&mut b).await, waiting());
}

#[tokio::test]
async fn malformed_messages_are_ignored() {
    let addr = spawn_server().await;
    let mut a = connect(addr).await;

    a.send(Message::Text("not json".into())).await.unwrap();
    a.send(Message::Text(r#"{"type":"dance"}"#.into())).await.unwrap();
    send_join(&mut a).await;

    assert_eq!(recv_json(&mut a).await, waiting());
}

#[tokio::test]
async fn next_splits_pair_and_rematches_partner_with_newcomer() {
    let addr = spawn_server().await;
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    let mut c = connect(addr).await;

    send_join(&mut a).await;
    recv_json(&mut a).await;
    send_join(&mut b).await;
    let first = recv_json(&mut b).await;
    recv_json(&mut a).await;

    send_next(&mut a).await;
    let left = recv_json(&mut b).await;
    assert_eq!(left["event"], "partner_left");
    assert_eq!(left["data"]["room"], first["data"]["room"]);
    assert_eq!(recv_json(&mut b).await, waiting());
    assert_eq!(recv_json(&mut a).await, waiting());

    send_join(&mut c).await;
    let to_b = recv_json(&mut b).await;
    let to_c = recv_json(&mut c).await;
    assert_eq!(to_b["event"], "connect_users");
    assert_eq!(to_b, to_c);
    assert_ne!(to_b["data"]["room"], first["data"]["room"]);
}
