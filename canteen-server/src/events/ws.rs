//! WebSocket push channel
//!
//! `GET /ws` upgrades the connection, subscribes to the event bus and
//! forwards each lifecycle event as one JSON text frame. One session per
//! subscriber; a dead or lagging session is dropped without affecting the
//! publisher or other sessions. Clients fetch the full order list on
//! (re)connect to reconcile; there is no replay.

use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use super::EventBus;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(ws_handler))
}

async fn ws_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    let bus = state.events.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, bus))
}

/// Forward bus events to one connected client until it goes away
async fn handle_socket(socket: WebSocket, bus: EventBus) {
    let (mut sink, mut stream) = socket.split();
    let mut rx = bus.subscribe();
    let shutdown = bus.shutdown_token().clone();

    tracing::debug!(target: "events", subscribers = bus.subscriber_count(), "websocket subscriber connected");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Ok(event) => {
                    let frame = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::warn!(target: "events", error = %e, "failed to encode lifecycle event");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Slow consumer; it reconciles via a full fetch
                    tracing::debug!(target: "events", skipped, "websocket subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // The channel is one-directional; ignore client frames
                Some(Ok(_)) => {}
            },
            _ = shutdown.cancelled() => break,
        }
    }

    tracing::debug!(target: "events", "websocket subscriber disconnected");
}
