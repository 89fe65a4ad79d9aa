mod room;
mod tick;

use crate::protocol::ServerMessage;
use crate::questions::QuestionBank;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

/// Outbound channel of a live WebSocket connection
pub type ClientSender = mpsc::UnboundedSender<ServerMessage>;

/// Registry entry for a live connection
#[derive(Debug, Clone)]
pub struct Connection {
    pub sender: ClientSender,
    /// Room this connection is routed to, once it created or joined one
    pub room: Option<RoomCode>,
}

/// Shared application state
///
/// Every room's [`Game`] sits behind its own mutex, so actions within a room
/// are serialized while different rooms proceed independently. Lock order is
/// always room first, connections second.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<RwLock<HashMap<RoomCode, Arc<Mutex<Game>>>>>,
    pub connections: Arc<RwLock<HashMap<ClientId, Connection>>>,
    pub bank: Arc<QuestionBank>,
    pub config: GameConfig,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_bank(QuestionBank::default(), GameConfig::default())
    }

    pub fn with_bank(bank: QuestionBank, config: GameConfig) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            connections: Arc::new(RwLock::new(HashMap::new())),
            bank: Arc::new(bank),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
