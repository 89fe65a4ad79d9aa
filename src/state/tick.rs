use super::AppState;
use crate::game::Outcome;
use chrono::{DateTime, Utc};

impl AppState {
    /// Expire every room whose phase deadline has passed.
    ///
    /// Returns the number of rooms that changed.
    pub async fn expire_deadlines(&self, now: DateTime<Utc>) -> usize {
        let rooms: Vec<_> = self.rooms.read().await.values().cloned().collect();

        let mut expired = 0;
        for room in rooms {
            let mut game = room.lock().await;
            if game.expire_deadline(now) == Outcome::Updated {
                tracing::info!("Room {} deadline expired in {:?}", game.code, game.phase);
                self.broadcast_state(&game).await;
                expired += 1;
            }
        }
        expired
    }
}
