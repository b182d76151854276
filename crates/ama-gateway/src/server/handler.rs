//! WebSocket handler
//!
//! Accepts subscribe upgrades and runs each connection until it is closed by
//! the client, evicted, or cancelled by shutdown.

use super::{GatewayError, GatewayState};
use crate::connection::{ConnectionState, Lifecycle, Subscriber};
use crate::hub::Hub;
use crate::protocol::Frame;
use ama_core::EventScope;
use ama_service::RoomService;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::HeaderMap,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the send task may take to flush its close frame
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Subscribe to the global scope (room creations)
pub async fn subscribe_global(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    ws: Option<WebSocketUpgrade>,
) -> Result<Response, GatewayError> {
    state.origin_policy().check(&headers)?;
    let ws = ws.ok_or(GatewayError::UpgradeRequired)?;

    let hub = state.hub().clone();
    Ok(ws.on_upgrade(move |socket| run_connection(hub, EventScope::Global, socket)))
}

/// Subscribe to one room's events
pub async fn subscribe_room(
    State(state): State<GatewayState>,
    Path(room_id): Path<String>,
    headers: HeaderMap,
    ws: Option<WebSocketUpgrade>,
) -> Result<Response, GatewayError> {
    state.origin_policy().check(&headers)?;

    let room_id = room_id
        .parse::<i64>()
        .map_err(|_| GatewayError::InvalidRoomId(room_id))?;

    RoomService::new(state.service_context())
        .ensure_exists(room_id)
        .await?;

    let ws = ws.ok_or(GatewayError::UpgradeRequired)?;

    let hub = state.hub().clone();
    Ok(ws.on_upgrade(move |socket| run_connection(hub, EventScope::Room(room_id), socket)))
}

/// Drive one upgraded connection through its lifecycle
async fn run_connection(hub: Arc<Hub>, scope: EventScope, socket: WebSocket) {
    let connection_id = hub.registry().next_connection_id();
    let mut lifecycle = Lifecycle::new(connection_id, scope);

    let (tx, mut rx) = mpsc::channel::<Frame>(hub.connection_buffer());
    let token = hub.child_token();
    let subscriber = Subscriber::new(connection_id, tx, token.clone());
    let subscription = hub.registry().subscribe(scope, subscriber.clone());
    lifecycle.advance(ConnectionState::Subscribed);

    tracing::info!(connection_id = %connection_id, scope = %scope, "Subscriber connected");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Frames -> socket; ends with a close frame carrying the reason
    let send_token = token.clone();
    let send_hub = hub.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = send_token.cancelled() => break,
                frame = rx.recv() => match frame {
                    Some(frame) => {
                        if ws_sink.send(Message::Text(frame.to_string())).await.is_err() {
                            tracing::debug!(connection_id = %connection_id, "Failed to write frame");
                            return;
                        }
                    }
                    None => break,
                },
            }
        }

        let code = subscriber.close_code(send_hub.is_shutting_down());
        let close = CloseFrame {
            code: code.as_u16(),
            reason: code.description().into(),
        };
        if ws_sink.send(Message::Close(Some(close))).await.is_err() {
            tracing::trace!(connection_id = %connection_id, "Close frame not delivered");
        }
    });

    // Inbound frames are drained and ignored; ping replies are left to the transport
    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = ws_stream.next().await {
            match message {
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client closed connection");
                    break;
                }
                Ok(_) => {
                    tracing::trace!(connection_id = %connection_id, "Inbound frame ignored");
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    let send_finished = tokio::select! {
        _ = &mut send_task => true,
        _ = &mut recv_task => false,
        () = token.cancelled() => false,
    };

    lifecycle.advance(ConnectionState::Closing);
    token.cancel();
    recv_task.abort();

    if !send_finished && tokio::time::timeout(CLOSE_GRACE, &mut send_task).await.is_err() {
        tracing::debug!(connection_id = %connection_id, "Send task did not finish, aborting");
        send_task.abort();
    }

    drop(subscription);
    lifecycle.advance(ConnectionState::Closed);

    tracing::info!(connection_id = %connection_id, scope = %scope, "Subscriber disconnected");
}
