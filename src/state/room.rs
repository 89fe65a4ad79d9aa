use super::{AppState, Connection};
use crate::error::{GameError, GameResult};
use crate::game::{Action, Outcome};
use crate::protocol::ServerMessage;
use crate::types::*;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Safe character set for room codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 5;
const MAX_NAME_CHARS: usize = 24;

fn generate_room_code() -> RoomCode {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

fn display_name(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.chars().take(MAX_NAME_CHARS).collect(),
        None => petname::petname(2, " ").unwrap_or_else(|| "Guest".to_string()),
    }
}

impl AppState {
    /// Register a new connection and hand back its identity and outbound queue
    pub async fn connect(&self) -> (ClientId, mpsc::UnboundedReceiver<ServerMessage>) {
        let client_id = ulid::Ulid::new().to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.write().await.insert(
            client_id.clone(),
            Connection {
                sender: tx,
                room: None,
            },
        );
        (client_id, rx)
    }

    /// Create a room hosted by `client_id`
    pub async fn create_room(&self, client_id: &str) -> GameResult<RoomCode> {
        self.leave_room(client_id).await;

        let (code, room) = {
            let mut rooms = self.rooms.write().await;
            // Collision - try again (rare with 28M combinations)
            let code = loop {
                let code = generate_room_code();
                if !rooms.contains_key(&code) {
                    break code;
                }
            };
            let game = Game::new(code.clone(), client_id.to_string(), self.config.clone());
            let room = Arc::new(Mutex::new(game));
            rooms.insert(code.clone(), room.clone());
            (code, room)
        };

        self.route_to(client_id, &code).await?;
        tracing::info!("Room {} created by {}", code, client_id);

        let game = room.lock().await;
        self.broadcast_state(&game).await;
        Ok(code)
    }

    /// Join an existing room as a player on the smaller team
    pub async fn join_room(
        &self,
        client_id: &str,
        code: &str,
        name: Option<&str>,
    ) -> GameResult<RoomCode> {
        let code = code.trim().to_uppercase();
        let room = self
            .get_room(&code)
            .await
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;

        self.leave_room(client_id).await;
        self.route_to(client_id, &code).await?;

        let mut game = room.lock().await;
        let player = game.add_player(client_id.to_string(), display_name(name));
        tracing::info!("{} joined room {} on {:?}", player.name, code, player.team);
        self.broadcast_state(&game).await;
        Ok(code)
    }

    /// Route an action to the connection's room and broadcast on change
    pub async fn apply_action(&self, client_id: &str, action: Action) -> GameResult<Outcome> {
        let code = self.room_of(client_id).await.ok_or(GameError::NotJoined)?;
        let room = self
            .get_room(&code)
            .await
            .ok_or_else(|| GameError::RoomNotFound(code.clone()))?;

        let mut game = room.lock().await;
        let outcome = game.apply(client_id, action, &self.bank, chrono::Utc::now())?;
        if outcome == Outcome::Updated {
            self.broadcast_state(&game).await;
        }
        Ok(outcome)
    }

    /// Forget a closed connection and drop its player from the room
    pub async fn disconnect(&self, client_id: &str) {
        self.leave_room(client_id).await;
        self.connections.write().await.remove(client_id);
        tracing::info!("Client {} disconnected", client_id);
    }

    pub async fn get_room(&self, code: &str) -> Option<Arc<Mutex<Game>>> {
        self.rooms.read().await.get(code).cloned()
    }

    /// Current snapshot of a room
    pub async fn get_game(&self, code: &str) -> Option<Game> {
        let room = self.get_room(code).await?;
        let game = room.lock().await;
        Some(game.clone())
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Send the full snapshot to every connection routed to this room.
    ///
    /// Callers hold the room lock, which keeps snapshots in mutation order.
    pub async fn broadcast_state(&self, game: &Game) {
        let msg = ServerMessage::State {
            state: Box::new(game.clone()),
            server_now: chrono::Utc::now(),
        };
        let connections = self.connections.read().await;
        for conn in connections
            .values()
            .filter(|c| c.room.as_deref() == Some(game.code.as_str()))
        {
            // Closed receivers are cleaned up by disconnect
            let _ = conn.sender.send(msg.clone());
        }
    }

    async fn room_of(&self, client_id: &str) -> Option<RoomCode> {
        self.connections
            .read()
            .await
            .get(client_id)
            .and_then(|c| c.room.clone())
    }

    async fn route_to(&self, client_id: &str, code: &str) -> GameResult<()> {
        let mut connections = self.connections.write().await;
        let conn = connections.get_mut(client_id).ok_or(GameError::NotJoined)?;
        conn.room = Some(code.to_string());
        Ok(())
    }

    /// Detach the connection from its room, removing its player if any.
    /// Team scores are left untouched.
    async fn leave_room(&self, client_id: &str) {
        let previous = {
            let mut connections = self.connections.write().await;
            connections.get_mut(client_id).and_then(|c| c.room.take())
        };
        let Some(code) = previous else {
            return;
        };
        let Some(room) = self.get_room(&code).await else {
            return;
        };

        let mut game = room.lock().await;
        if let Some(player) = game.remove_player(client_id) {
            tracing::info!("{} left room {}", player.name, code);
        }
        self.broadcast_state(&game).await;
    }
}
