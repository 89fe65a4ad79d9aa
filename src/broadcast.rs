use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Spawn a background task that expires timed phases (round play, fast money)
/// once their deadline has passed
pub fn spawn_deadline_watcher(state: Arc<AppState>, period: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let expired = state.expire_deadlines(chrono::Utc::now()).await;
            if expired > 0 {
                tracing::debug!("Deadline sweep expired {} room(s)", expired);
            }
        }
    });
}
