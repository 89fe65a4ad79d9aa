//! Server and game configuration loaded from the environment

use crate::types::GameConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Directory served for every path not claimed by the API or `/ws`
    pub static_dir: PathBuf,
    /// Optional JSON question bank replacing the built-in one
    pub questions_path: Option<PathBuf>,
    pub tick_interval: Duration,
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8787,
            static_dir: PathBuf::from("static"),
            questions_path: None,
            tick_interval: Duration::from_millis(1000),
            game: GameConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables, keeping defaults for
    /// anything unset or unparseable
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let tick_interval = env_parse::<u64>("TICK_INTERVAL_MS")
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval);

        Self {
            bind_addr: env_parse("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: env_parse("PORT").unwrap_or(defaults.port),
            static_dir: env_string("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            questions_path: env_string("QUESTIONS_PATH").map(PathBuf::from),
            tick_interval,
            game: GameConfig::from_env(),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl GameConfig {
    /// Default rules with per-deployment overrides
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            round_seconds: env_parse("ROUND_SECONDS").unwrap_or(defaults.round_seconds),
            winning_score: env_parse("WINNING_SCORE").unwrap_or(defaults.winning_score),
            max_rounds: env_parse("MAX_ROUNDS").unwrap_or(defaults.max_rounds),
            fast_money_p1_seconds: env_parse("FAST_MONEY_P1_SECONDS")
                .unwrap_or(defaults.fast_money_p1_seconds),
            fast_money_p2_seconds: env_parse("FAST_MONEY_P2_SECONDS")
                .unwrap_or(defaults.fast_money_p2_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "PORT",
        "BIND_ADDR",
        "STATIC_DIR",
        "QUESTIONS_PATH",
        "TICK_INTERVAL_MS",
        "ROUND_SECONDS",
        "WINNING_SCORE",
        "MAX_ROUNDS",
        "FAST_MONEY_P1_SECONDS",
        "FAST_MONEY_P2_SECONDS",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::from_env();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8787");
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert!(config.questions_path.is_none());
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.game, GameConfig::default());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("PORT", "9000");
        std::env::set_var("BIND_ADDR", "127.0.0.1");
        std::env::set_var("QUESTIONS_PATH", " questions.json ");
        std::env::set_var("TICK_INTERVAL_MS", "250");
        std::env::set_var("WINNING_SCORE", "200");
        std::env::set_var("FAST_MONEY_P2_SECONDS", "30");

        let config = ServerConfig::from_env();
        clear_env();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.questions_path, Some(PathBuf::from("questions.json")));
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.game.winning_score, 200);
        assert_eq!(config.game.fast_money_p2_seconds, 30);
        assert_eq!(config.game.round_seconds, 45);
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("MAX_ROUNDS", "-3");
        std::env::set_var("TICK_INTERVAL_MS", "0");

        let config = ServerConfig::from_env();
        clear_env();

        assert_eq!(config.port, 8787);
        assert_eq!(config.game.max_rounds, 5);
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }
}
