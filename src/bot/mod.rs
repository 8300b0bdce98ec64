//! # Chat bot surface
//!
//! Turns chat lines into game operations and game results into reply text.
//!
//! - [`commands`] - prefixed command parser
//! - [`flow`] - interactive character creation state with per-step timeouts
//! - [`render`] - plain-text formatting of profiles, listings and outcomes
//! - [`server`] - [`BotServer`], the message router and its async run loop
//! - [`console`] - stdin/stdout transport used by the binary
//!
//! The chat platform itself is a collaborator: anything that can produce
//! [`ChatMessage`]s and deliver [`Reply`]s can drive [`BotServer`].

pub mod commands;
pub mod console;
pub mod flow;
pub mod render;
pub mod server;

pub use server::BotServer;

/// One inbound chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Opaque platform identifier; keys the player record.
    pub user_id: String,
    pub display_name: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(user_id: &str, display_name: &str, text: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            text: text.to_string(),
        }
    }
}

/// Text addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub to: String,
    pub text: String,
}

impl Reply {
    pub fn new(to: &str, text: String) -> Self {
        Self {
            to: to.to_string(),
            text,
        }
    }
}
