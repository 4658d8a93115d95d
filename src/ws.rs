//! Per-room change feed.
//!
//! Clients subscribe with `GET /ws?room=CODE` and receive the room's
//! row-level change events as JSON. Nothing flows client to server.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;
use crate::types::normalize_room_code;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub room: String,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let code = normalize_room_code(&params.room);
    tracing::info!("change feed subscription for room {}", code);
    ws.on_upgrade(move |socket| handle_socket(socket, code, state))
}

async fn handle_socket(socket: WebSocket, code: String, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) if event.room_code() == code => {
                        let Ok(json) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {} // other room
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("change feed for {} lagged by {} events", code, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {} // ignore pings and stray messages
                    Some(Err(_)) => break,
                }
            }
        }
    }

    tracing::debug!("change feed for {} disconnected", code);
}
