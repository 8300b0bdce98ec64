//! Tunable game-balance numbers. Loaded from the `[game]` section of the config
//! file; every field has a default so an empty section yields standard rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameRules {
    /// Starting and baseline max health/chakra.
    pub base_vitals: u32,
    /// Max health/chakra growth per level gained.
    pub vitals_per_level: u32,
    /// Starting value of every base stat.
    pub base_stat: i64,
    pub starting_ryo: u64,
    pub free_rerolls: u32,
    pub reroll_cost: u64,
    /// Clans offered at the clan step of interactive creation.
    pub clan_offers: usize,
    pub heal_chakra_cost: u32,
    pub heal_amount: u32,
    /// A uniform draw in `[0, 1)` at or below this value fails the mission.
    pub mission_failure_threshold: f64,
    pub daily_base_ryo: u64,
    pub daily_ryo_per_level: u64,
    pub daily_base_xp: u64,
    pub daily_xp_per_level: u64,
    pub daily_cooldown_hours: i64,
    /// Fixed seed for the game RNG; `None` seeds from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            base_vitals: 100,
            vitals_per_level: 10,
            base_stat: 10,
            starting_ryo: 1000,
            free_rerolls: 3,
            reroll_cost: 500,
            clan_offers: 3,
            heal_chakra_cost: 10,
            heal_amount: 20,
            mission_failure_threshold: 0.3,
            daily_base_ryo: 100,
            daily_ryo_per_level: 10,
            daily_base_xp: 50,
            daily_xp_per_level: 5,
            daily_cooldown_hours: 24,
            rng_seed: None,
        }
    }
}

impl GameRules {
    pub fn daily_ryo(&self, level: u32) -> u64 {
        self.daily_base_ryo
            .saturating_add(self.daily_ryo_per_level.saturating_mul(level as u64))
    }

    pub fn daily_xp(&self, level: u32) -> u64 {
        self.daily_base_xp
            .saturating_add(self.daily_xp_per_level.saturating_mul(level as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_rewards_scale_with_level() {
        let rules = GameRules::default();
        assert_eq!(rules.daily_ryo(1), 110);
        assert_eq!(rules.daily_xp(1), 55);
        assert_eq!(rules.daily_ryo(10), 200);
        assert_eq!(rules.daily_xp(10), 100);
    }

    #[test]
    fn partial_toml_section_keeps_defaults() {
        let rules: GameRules = toml::from_str("reroll_cost = 750\nrng_seed = 7").unwrap();
        assert_eq!(rules.reroll_cost, 750);
        assert_eq!(rules.rng_seed, Some(7));
        assert_eq!(rules.free_rerolls, 3);
        assert_eq!(rules.heal_chakra_cost, 10);
    }
}
