//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::mpsc;

use super::state::AppState;

/// WebSocket upgrade handler for `/status`
pub async fn status_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual status connection until either side closes it
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let (tx, mut rx) = mpsc::channel(state.config.status_buffer);
    let connection_id = state.registry.connect(tx);

    loop {
        tokio::select! {
            // Status snapshots from the broadcaster
            outbound = rx.recv() => {
                match outbound {
                    Some(json) => {
                        if socket.send(Message::Text(json)).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    None => break, // Dropped by the registry
                }
            }

            // Inbound frames only keep the connection alive
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        tracing::debug!(connection_id, error = %err, "status socket error");
                        break;
                    }
                    None => break, // Client disconnected
                }
            }
        }
    }

    state.registry.disconnect(connection_id);
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(_) | Message::Binary(_) => true, // Content is ignored
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}
