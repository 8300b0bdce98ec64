//! # Shinobibot - a ninja RPG for text chat
//!
//! Players create a ninja in one of five villages, receive a rarity-weighted clan,
//! take missions, spend ryo in the shop and level up, all through prefixed chat
//! commands such as `!create konoha`, `!accept Lost Cat` or `!buy Jutsu Scroll`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shinobibot::bot::{console, BotServer};
//! use shinobibot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut server = BotServer::new(&config)?;
//!     let (inbound, outbound, _writer) = console::spawn_stdio();
//!     server.run(inbound, outbound).await
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - player records, clans, progression, missions, shop, daily reward, store
//! - [`bot`] - command parsing, interactive creation flow, rendering, server loop
//! - [`config`] - TOML configuration
//! - [`validation`] - ninja name and chat text checks
//! - [`logutil`] - log-safe escaping of user text
//!
//! ```text
//! ┌─────────────────┐
//! │   BotServer     │ ← commands, flows, replies
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameService   │ ← load, mutate a copy, persist on success
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   PlayerStore   │ ← sled or players.json
//! └─────────────────┘
//! ```

pub mod bot;
pub mod config;
pub mod game;
pub mod logutil;
pub mod validation;
