//! Real-time hub integration tests
//!
//! Drive the subscribe routes with a real WebSocket client while mutating
//! through the REST API, against a server backed by in-memory storage.
//!
//! Run with: cargo test -p integration-tests --test hub_tests

use std::time::Duration;

use ama_core::events::EventScope;
use ama_core::{EventEnvelope, Message};
use futures_util::{SinkExt, StreamExt};
use integration_tests::{
    assert_json, assert_silent, expect_close, fixtures::*, next_event, test_config, TestServer,
    WAIT,
};
use uuid::Uuid;
use reqwest::StatusCode;
use tokio_tungstenite::tungstenite::{self, Message as WsMessage};

const QUIET: Duration = Duration::from_millis(200);

async fn create_room(server: &TestServer, token: &str, name: &str) -> RoomResponse {
    let response = server
        .post_auth("/api/rooms", token, &CreateRoomRequest::named(name))
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_message(
    server: &TestServer,
    token: &str,
    room_id: i64,
    text: &str,
) -> CreatedMessageResponse {
    let response = server
        .post_auth(
            &format!("/api/rooms/{room_id}/messages"),
            token,
            &CreateMessageRequest::text(text),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

fn handshake_status(err: tungstenite::Error) -> StatusCode {
    match err {
        tungstenite::Error::Http(response) => {
            StatusCode::from_u16(response.status().as_u16()).unwrap()
        }
        other => panic!("expected an HTTP rejection, got {other:?}"),
    }
}

// ============================================================================
// Event Delivery
// ============================================================================

#[tokio::test]
async fn test_room_subscriber_receives_message_created() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token, "R").await;

    let mut ws = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(room.id), 1)
        .await
        .unwrap();

    let created = create_message(&server, &token, room.id, "hello").await;

    let event = next_event(&mut ws).await.unwrap();
    assert_eq!(event["kind"], "message_created");
    assert_eq!(event["value"]["id"], created.id.to_string());
    assert_eq!(event["value"]["message"], "hello");
}

#[tokio::test]
async fn test_global_subscriber_receives_rooms_in_order() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user_id, token) = server.token("host").unwrap();

    let mut ws = server.connect("/subscribe").await.unwrap();
    server
        .wait_for_subscribers(EventScope::Global, 1)
        .await
        .unwrap();

    let go = create_room(&server, &token, "Go").await;
    let rust = create_room(&server, &token, "Rust").await;

    let first = next_event(&mut ws).await.unwrap();
    let second = next_event(&mut ws).await.unwrap();

    assert_eq!(first["kind"], "room_created");
    assert_eq!(first["value"]["name"], "Go");
    assert_eq!(first["value"]["id"], go.id);
    assert_eq!(first["value"]["user_id"], user_id.to_string());
    assert_eq!(first["value"]["creator_name"], "host");

    assert_eq!(second["kind"], "room_created");
    assert_eq!(second["value"]["name"], "Rust");
    assert_eq!(second["value"]["id"], rust.id);
}

#[tokio::test]
async fn test_reaction_and_answer_events() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, u1) = server.token("u1").unwrap();
    let (_, u2) = server.token("u2").unwrap();
    let room = create_room(&server, &u1, "R").await;
    let created = create_message(&server, &u1, room.id, "M").await;

    let mut ws = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(room.id), 1)
        .await
        .unwrap();

    let react = format!("/api/rooms/{}/messages/{}/react", room.id, created.id);
    for token in [&u1, &u2] {
        let response = server.patch_empty(&react, token).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = server.delete_auth(&react, &u1).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A failed removal publishes nothing
    let response = server.delete_auth(&react, &u1).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server
        .patch_auth(
            &format!("/api/rooms/{}/messages/{}/answer", room.id, created.id),
            &u1,
            &AnswerMessageRequest::text("yes"),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut seen = Vec::new();
    for _ in 0..4 {
        let event = next_event(&mut ws).await.unwrap();
        assert_eq!(event["value"]["id"], created.id.to_string());
        seen.push(event);
    }

    assert_eq!(seen[0]["kind"], "reaction_added");
    assert_eq!(seen[0]["value"]["count"], 1);
    assert_eq!(seen[1]["kind"], "reaction_added");
    assert_eq!(seen[1]["value"]["count"], 2);
    assert_eq!(seen[2]["kind"], "reaction_removed");
    assert_eq!(seen[2]["value"]["count"], 1);
    assert_eq!(seen[3]["kind"], "message_answered");
    assert_eq!(seen[3]["value"]["answer"], "yes");

    assert_silent(&mut ws, QUIET).await.unwrap();
}

#[tokio::test]
async fn test_scopes_are_isolated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let first = create_room(&server, &token, "first").await;
    let second = create_room(&server, &token, "second").await;

    let mut global = server.connect("/subscribe").await.unwrap();
    let mut in_first = server
        .connect(&format!("/subscribe/room/{}", first.id))
        .await
        .unwrap();
    let mut in_second = server
        .connect(&format!("/subscribe/room/{}", second.id))
        .await
        .unwrap();
    server.wait_for_subscribers(EventScope::Global, 1).await.unwrap();
    server
        .wait_for_subscribers(EventScope::Room(first.id), 1)
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(second.id), 1)
        .await
        .unwrap();

    create_message(&server, &token, first.id, "only here").await;

    let event = next_event(&mut in_first).await.unwrap();
    assert_eq!(event["kind"], "message_created");
    assert_silent(&mut in_second, QUIET).await.unwrap();
    assert_silent(&mut global, QUIET).await.unwrap();
}

#[tokio::test]
async fn test_every_subscriber_of_a_room_receives_the_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token, "R").await;

    let path = format!("/subscribe/room/{}", room.id);
    let mut clients = Vec::new();
    for _ in 0..3 {
        clients.push(server.connect(&path).await.unwrap());
    }
    server
        .wait_for_subscribers(EventScope::Room(room.id), 3)
        .await
        .unwrap();

    let created = create_message(&server, &token, room.id, "to all").await;

    for ws in &mut clients {
        let event = next_event(ws).await.unwrap();
        assert_eq!(event["value"]["id"], created.id.to_string());
    }
}

// ============================================================================
// Handshake Rejections
// ============================================================================

#[tokio::test]
async fn test_subscribe_unknown_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let err = server.connect("/subscribe/room/999").await.unwrap_err();
    let err = err.downcast::<tungstenite::Error>().unwrap();
    assert_eq!(handshake_status(err), StatusCode::NOT_FOUND);
    assert_eq!(server.state().hub().registry().connection_count(), 0);
}

#[tokio::test]
async fn test_subscribe_invalid_room_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let err = server.connect("/subscribe/room/abc").await.unwrap_err();
    let err = err.downcast::<tungstenite::Error>().unwrap();
    assert_eq!(handshake_status(err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_subscribe_without_upgrade() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/subscribe").await.unwrap();
    assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_disconnect_unregisters_connections() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token, "R").await;

    let mut global = server.connect("/subscribe").await.unwrap();
    let mut in_room = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    let dropped = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(room.id), 2)
        .await
        .unwrap();
    assert_eq!(server.state().hub().registry().connection_count(), 3);

    global.close(None).await.unwrap();
    in_room.send(WsMessage::Close(None)).await.unwrap();
    drop(dropped);

    server.wait_for_no_connections().await.unwrap();

    // Publishing into the now empty room is a no-op
    create_message(&server, &token, room.id, "anyone?").await;
    assert_eq!(server.state().hub().registry().room_count(), 0);
}

#[tokio::test]
async fn test_shutdown_closes_with_going_away() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token, "R").await;

    let mut ws = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(room.id), 1)
        .await
        .unwrap();
    let hub = server.state().hub().clone();

    let (stopped, close) = tokio::join!(server.shutdown(), expect_close(&mut ws));
    stopped.unwrap();

    let frame = close.unwrap().expect("close frame");
    assert_eq!(u16::from(frame.code), 1001);
    assert_eq!(hub.registry().connection_count(), 0);
}

#[tokio::test]
async fn test_slow_consumer_closed_with_4008() {
    let mut config = test_config().unwrap();
    config.hub.connection_buffer = 1;
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token, "R").await;

    let mut ws = server
        .connect(&format!("/subscribe/room/{}", room.id))
        .await
        .unwrap();
    server
        .wait_for_subscribers(EventScope::Room(room.id), 1)
        .await
        .unwrap();

    // Two fan-outs with no yield in between: the writer never gets to drain
    // the single-slot buffer, so the second one overflows it.
    let dispatcher = server.state().hub().dispatcher().clone();
    let first = Message::new(Uuid::new_v4(), room.id, "first");
    let second = Message::new(Uuid::new_v4(), room.id, "second");
    assert_eq!(
        dispatcher
            .deliver(&EventEnvelope::message_created(&first))
            .delivered,
        1
    );
    assert_eq!(
        dispatcher
            .deliver(&EventEnvelope::message_created(&second))
            .evicted,
        1
    );

    let close = loop {
        match tokio::time::timeout(WAIT, ws.next()).await.unwrap() {
            Some(Ok(WsMessage::Close(frame))) => break frame,
            Some(Ok(WsMessage::Text(text))) => assert!(!text.contains("second")),
            Some(Ok(_)) => continue,
            other => panic!("expected a close frame, got {other:?}"),
        }
    };
    assert_eq!(u16::from(close.expect("close frame").code), 4008);

    server.wait_for_no_connections().await.unwrap();
    assert_eq!(
        server
            .state()
            .hub()
            .registry()
            .subscriber_count(EventScope::Room(room.id)),
        0
    );
}
