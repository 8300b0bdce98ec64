//! Shared fixtures for integration tests.

use shinobibot::bot::{BotServer, ChatMessage};
use shinobibot::config::{Config, StorageBackend};
use shinobibot::game::GameRules;

/// Config rooted in `dir` with a fixed RNG seed and `sensei` as the only admin.
#[allow(dead_code)]
pub fn test_config(dir: &std::path::Path, backend: StorageBackend) -> Config {
    let mut config = Config::default();
    config.storage.data_dir = dir.to_string_lossy().to_string();
    config.storage.backend = backend;
    config.bot.admin_ids = vec!["sensei".to_string()];
    config.logging.file = None;
    config.logging.security_file = None;
    config.game = GameRules {
        rng_seed: Some(2024),
        ..GameRules::default()
    };
    config
}

/// Send `text` as `user` and join all replies addressed to them.
#[allow(dead_code)]
pub fn say(server: &mut BotServer, user: &str, text: &str) -> String {
    server
        .handle_message(&ChatMessage::new(user, user, text))
        .expect("handle message")
        .into_iter()
        .filter(|r| r.to == user)
        .map(|r| r.text)
        .collect::<Vec<_>>()
        .join("\n")
}
