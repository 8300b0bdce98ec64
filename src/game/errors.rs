use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::validation::NinjaNameError;

/// Errors raised by game operations and the player record store.
///
/// Everything except the storage wrappers is a soft, user-facing refusal: the
/// operation left the player untouched and the bot should just say why.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("you already have a character")]
    AlreadyExists,

    #[error("no character found for {0}")]
    NotFound(String),

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("invalid ninja name: {0}")]
    InvalidName(#[from] NinjaNameError),

    #[error("level {required} required (you are level {current})")]
    LevelTooLow { required: u32, current: u32 },

    #[error("a mission is already in progress")]
    MissionAlreadyActive,

    #[error("no mission in progress")]
    NoActiveMission,

    #[error("insufficient funds: need {needed} ryo, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("insufficient chakra: need {needed}, have {available}")]
    InsufficientChakra { needed: u32, available: u32 },

    #[error("already at full health")]
    AlreadyFullHealth,

    #[error("daily reward already claimed; next claim at {next_eligible}")]
    TooEarly { next_eligible: DateTime<Utc> },

    /// Admin-only command used by someone outside the admin list.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}

impl GameError {
    /// True for refusals that leave state unchanged and should be reported to the
    /// user; false for persistence failures.
    pub fn is_soft(&self) -> bool {
        !matches!(
            self,
            GameError::Sled(_)
                | GameError::Bincode(_)
                | GameError::Json(_)
                | GameError::Io(_)
                | GameError::SchemaMismatch { .. }
        )
    }
}
