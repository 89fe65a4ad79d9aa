pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;

use crate::error::GameError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(msg: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!("Failed to serialize server message: {}", e);
            None
        }
    }
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (client_id, mut outbound) = state.connect().await;

    tracing::info!("WebSocket connected: {}", client_id);

    let welcome = ServerMessage::Welcome {
        client_id: client_id.clone(),
    };
    if let Some(msg) = encode(&welcome) {
        if sender.send(msg).await.is_err() {
            tracing::error!("Failed to send welcome message");
            state.disconnect(&client_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            // Room broadcasts routed to this connection
            queued = outbound.recv() => {
                let Some(msg) = queued else { break };
                if let Some(frame) = encode(&msg) {
                    if sender.send(frame).await.is_err() {
                        break;
                    }
                }
            }

            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!("Received message from {}: {}", client_id, text);

                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                handlers::handle_message(client_msg, &client_id, &state).await
                            }
                            Err(e) => {
                                tracing::warn!("Failed to parse client message: {}", e);
                                Some(ServerMessage::from(&GameError::Parse(e.to_string())))
                            }
                        };

                        if let Some(frame) = reply.as_ref().and_then(encode) {
                            if sender.send(frame).await.is_err() {
                                tracing::error!("Failed to send response");
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    state.disconnect(&client_id).await;
}
