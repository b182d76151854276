//! API Integration Tests
//!
//! Each test starts its own server on an ephemeral port backed by
//! in-memory storage, so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_healthcheck() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/healthcheck").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_health_ready_without_database() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["database"], "disabled");
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_create_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (user_id, token) = server.token("alice").unwrap();

    let request = CreateRoomRequest::unique();
    let response = server.post_auth("/api/rooms", &token, &request).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(room.name, request.name);
    assert_eq!(room.description, "An AMA test room");
    assert_eq!(room.user_id, user_id);
    assert_eq!(room.creator_name, "alice");
}

#[tokio::test]
async fn test_create_room_requires_auth() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post("/api/rooms", &CreateRoomRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_room_rejects_invalid_token() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post_auth("/api/rooms", "not-a-token", &CreateRoomRequest::unique())
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_create_room_blank_name() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();

    let response = server
        .post_auth("/api/rooms", &token, &CreateRoomRequest::named("   "))
        .await
        .unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!body.error.code.is_empty());
}

#[tokio::test]
async fn test_list_and_get_rooms() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();

    for name in ["Go", "Rust"] {
        let response = server
            .post_auth("/api/rooms", &token, &CreateRoomRequest::named(name))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get("/api/rooms").await.unwrap();
    let rooms: Vec<RoomResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    let names: Vec<_> = rooms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Go", "Rust"]);

    let response = server.get(&format!("/api/rooms/{}", rooms[1].id)).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(room.name, "Rust");
}

#[tokio::test]
async fn test_get_unknown_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/rooms/999").await.unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_ROOM");
}

#[tokio::test]
async fn test_get_room_invalid_id() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/rooms/abc").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Message Tests
// ============================================================================

async fn create_room(server: &TestServer, token: &str) -> RoomResponse {
    let response = server
        .post_auth("/api/rooms", token, &CreateRoomRequest::unique())
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

#[tokio::test]
async fn test_create_and_list_messages() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();
    let room = create_room(&server, &token).await;

    let first = create_message(&server, &token, room.id, "first?").await;
    let second = create_message(&server, &token, room.id, "second?").await;

    let response = server
        .get(&format!("/api/rooms/{}/messages", room.id))
        .await
        .unwrap();
    let messages: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let ids: Vec<_> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, [second.id, first.id]);
    assert!(messages.iter().all(|m| m.room_id == room.id));
    assert!(messages.iter().all(|m| !m.answered && m.reaction_count == 0));
}

#[tokio::test]
async fn test_create_message_trims_text() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();
    let room = create_room(&server, &token).await;

    let created = create_message(&server, &token, room.id, "  why?  ").await;

    let response = server
        .get(&format!("/api/rooms/{}/messages/{}", room.id, created.id))
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(message.message, "why?");
}

#[tokio::test]
async fn test_create_message_blank() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();
    let room = create_room(&server, &token).await;

    let response = server
        .post_auth(
            &format!("/api/rooms/{}/messages", room.id),
            &token,
            &CreateMessageRequest::text("   "),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_create_message_unknown_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();

    let response = server
        .post_auth(
            "/api/rooms/4242/messages",
            &token,
            &CreateMessageRequest::text("anyone?"),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_get_message_from_other_room() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("alice").unwrap();
    let room = create_room(&server, &token).await;
    let other = create_room(&server, &token).await;
    let created = create_message(&server, &token, room.id, "here").await;

    let response = server
        .get(&format!("/api/rooms/{}/messages/{}", other.id, created.id))
        .await
        .unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_MESSAGE");
}

#[tokio::test]
async fn test_answer_message_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("host").unwrap();
    let room = create_room(&server, &token).await;
    let created = create_message(&server, &token, room.id, "when?").await;
    let path = format!("/api/rooms/{}/messages/{}/answer", room.id, created.id);

    let response = server
        .patch_auth(&path, &token, &AnswerMessageRequest::text("tomorrow"))
        .await
        .unwrap();
    let answered: AnsweredMessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(answered.id, created.id);
    assert_eq!(answered.answer, "tomorrow");

    let response = server
        .patch_auth(&path, &token, &AnswerMessageRequest::text("never"))
        .await
        .unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "MESSAGE_ALREADY_ANSWERED");

    let response = server
        .get(&format!("/api/rooms/{}/messages/{}", room.id, created.id))
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(message.answered);
    assert_eq!(message.answer.as_deref(), Some("tomorrow"));
}

// ============================================================================
// Reaction Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_counts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, u1) = server.token("u1").unwrap();
    let (_, u2) = server.token("u2").unwrap();
    let room = create_room(&server, &u1).await;
    let created = create_message(&server, &u1, room.id, "M").await;
    let path = format!("/api/rooms/{}/messages/{}/react", room.id, created.id);

    let response = server.patch_empty(&path, &u1).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 1);

    let response = server.patch_empty(&path, &u2).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 2);

    let response = server.delete_auth(&path, &u1).await.unwrap();
    let count: ReactionCountResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count.count, 1);

    let response = server.delete_auth(&path, &u1).await.unwrap();
    let body: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_REACTION");

    let response = server
        .get(&format!("/api/rooms/{}/messages/{}", room.id, created.id))
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(message.reaction_count, 1);
}

#[tokio::test]
async fn test_duplicate_reaction() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("u1").unwrap();
    let room = create_room(&server, &token).await;
    let created = create_message(&server, &token, room.id, "M").await;
    let path = format!("/api/rooms/{}/messages/{}/react", room.id, created.id);

    let response = server.patch_empty(&path, &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.patch_empty(&path, &token).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_react_to_unknown_message() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("u1").unwrap();
    let room = create_room(&server, &token).await;

    let path = format!("/api/rooms/{}/messages/{}/react", room.id, Uuid::new_v4());
    let response = server.patch_empty(&path, &token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_reacted_message_ids() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, token) = server.token("u1").unwrap();
    let room = create_room(&server, &token).await;
    let liked = create_message(&server, &token, room.id, "liked").await;
    create_message(&server, &token, room.id, "ignored").await;

    let path = format!("/api/rooms/{}/messages/{}/react", room.id, liked.id);
    let response = server.patch_empty(&path, &token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .get_auth(&format!("/api/rooms/{}/reactions", room.id), &token)
        .await
        .unwrap();
    let reacted: ReactedMessagesResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(reacted.ids, [liked.id]);
}
