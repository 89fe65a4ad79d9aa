//! WebSocket message dispatch
//!
//! Room entry is handled here; every other message becomes a game action and
//! is routed to the sender's room. Host checks happen inside the engine.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use std::sync::Arc;

/// Handle client messages and return an optional direct reply.
///
/// State changes reach the client through the room broadcast, so successful
/// actions produce no reply.
pub async fn handle_message(
    msg: ClientMessage,
    client_id: &str,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    let result = match msg {
        ClientMessage::Create => state
            .create_room(client_id)
            .await
            .map(|code| Some(ServerMessage::Created { code })),

        ClientMessage::Join { code, name } => state
            .join_room(client_id, &code, name.as_deref())
            .await
            .map(|code| Some(ServerMessage::Joined { code })),

        other => match other.into_action() {
            Some(action) => state.apply_action(client_id, action).await.map(|_| None),
            None => Ok(None),
        },
    };

    match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Rejected message from {}: {}", client_id, e);
            Some(ServerMessage::from(&e))
        }
    }
}
