use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feud::{api, broadcast, config::ServerConfig, questions::QuestionBank, state::AppState, ws};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feud=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting feud server...");

    let config = ServerConfig::from_env();

    let bank = match &config.questions_path {
        Some(path) => match QuestionBank::from_json_file(path) {
            Ok(bank) => {
                tracing::info!(
                    "Loaded {} surveys and {} fast money sets from {}",
                    bank.surveys.len(),
                    bank.fast_money_sets.len(),
                    path.display()
                );
                bank
            }
            Err(e) => {
                tracing::error!("Failed to load question bank {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => QuestionBank::default(),
    };

    let state = Arc::new(AppState::with_bank(bank, config.game.clone()));

    // Spawn background task that closes rounds and fast money when time runs out
    broadcast::spawn_deadline_watcher(state.clone(), config.tick_interval);

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(api::routes())
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
