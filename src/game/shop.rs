//! Shop items and purchases.
//!
//! A purchase debits the price first and then applies the effect. The debit stands
//! even when the effect turns out to do nothing (a scroll teaching a technique the
//! player already knows).

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::errors::GameError;
use crate::game::progression::{grant_experience, LevelUp};
use crate::game::rules::GameRules;
use crate::game::types::Player;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "amount")]
pub enum ItemEffect {
    RestoreHealth(u32),
    RestoreChakra(u32),
    GrantExperience(u64),
    /// Teach one technique drawn uniformly from the catalog's jutsu pool.
    LearnTechnique,
}

impl ItemEffect {
    pub fn describe(&self) -> String {
        match self {
            ItemEffect::RestoreHealth(n) => format!("Restores {} health", n),
            ItemEffect::RestoreChakra(n) => format!("Restores {} chakra", n),
            ItemEffect::GrantExperience(n) => format!("Grants {} XP", n),
            ItemEffect::LearnTechnique => "Teaches a random jutsu".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopItem {
    pub name: String,
    pub price: u64,
    pub effect: ItemEffect,
}

impl ShopItem {
    pub fn new(name: &str, price: u64, effect: ItemEffect) -> Self {
        Self {
            name: name.to_string(),
            price,
            effect,
        }
    }
}

/// What the item actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseEffect {
    Healed { health: u32, max_health: u32 },
    ChakraRestored { chakra: u32, max_chakra: u32 },
    Experience { amount: u64, level_up: Option<LevelUp> },
    LearnedJutsu(String),
    AlreadyKnewJutsu(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOutcome {
    pub item: ShopItem,
    pub ryo_left: u64,
    pub effect: PurchaseEffect,
}

fn no_techniques() -> GameError {
    GameError::InvalidChoice("no techniques to teach".into())
}

pub fn purchase<R: Rng + ?Sized>(
    player: &mut Player,
    item: &ShopItem,
    jutsu_pool: &[String],
    rules: &GameRules,
    rng: &mut R,
) -> Result<PurchaseOutcome, GameError> {
    if player.ryo < item.price {
        return Err(GameError::InsufficientFunds {
            needed: item.price,
            available: player.ryo,
        });
    }
    // A scroll with nothing to teach is refused before any ryo changes hands.
    if matches!(item.effect, ItemEffect::LearnTechnique) && jutsu_pool.is_empty() {
        return Err(no_techniques());
    }
    player.ryo -= item.price;

    let effect = match &item.effect {
        ItemEffect::RestoreHealth(amount) => {
            player.health = player.health.saturating_add(*amount).min(player.max_health);
            PurchaseEffect::Healed {
                health: player.health,
                max_health: player.max_health,
            }
        }
        ItemEffect::RestoreChakra(amount) => {
            player.chakra = player.chakra.saturating_add(*amount).min(player.max_chakra);
            PurchaseEffect::ChakraRestored {
                chakra: player.chakra,
                max_chakra: player.max_chakra,
            }
        }
        ItemEffect::GrantExperience(amount) => PurchaseEffect::Experience {
            amount: *amount,
            level_up: grant_experience(player, *amount, rules),
        },
        ItemEffect::LearnTechnique => {
            let jutsu = jutsu_pool.choose(rng).cloned().ok_or_else(no_techniques)?;
            if player.knows_jutsu(&jutsu) {
                PurchaseEffect::AlreadyKnewJutsu(jutsu)
            } else {
                player.jutsu.push(jutsu.clone());
                PurchaseEffect::LearnedJutsu(jutsu)
            }
        }
    };

    Ok(PurchaseOutcome {
        item: item.clone(),
        ryo_left: player.ryo,
        effect,
    })
}
