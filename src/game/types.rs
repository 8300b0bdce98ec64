use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::game::rules::GameRules;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;

/// Attribute names every new character starts with.
pub const BASE_STAT_NAMES: [&str; 6] = [
    "ninjutsu",
    "taijutsu",
    "genjutsu",
    "intelligence",
    "strength",
    "speed",
];

/// Named attributes to integer values. Ordered so profiles render stably.
pub type StatBlock = BTreeMap<String, i64>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Village {
    Konoha,
    Suna,
    Kiri,
    Kumo,
    Iwa,
}

impl Village {
    pub const ALL: [Village; 5] = [
        Village::Konoha,
        Village::Suna,
        Village::Kiri,
        Village::Kumo,
        Village::Iwa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Village::Konoha => "Konoha",
            Village::Suna => "Suna",
            Village::Kiri => "Kiri",
            Village::Kumo => "Kumo",
            Village::Iwa => "Iwa",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Village::Konoha => "🍃",
            Village::Suna => "💨",
            Village::Kiri => "💧",
            Village::Kumo => "⚡",
            Village::Iwa => "🗻",
        }
    }

    /// Resolve a village from its name (case-insensitive), its emoji, or its
    /// 1-based position in [`Village::ALL`].
    pub fn parse_choice(input: &str) -> Option<Village> {
        let trimmed = input.trim();
        if let Ok(idx) = trimmed.parse::<usize>() {
            return idx.checked_sub(1).and_then(|i| Self::ALL.get(i).copied());
        }
        Self::ALL.iter().copied().find(|v| {
            v.name().eq_ignore_ascii_case(trimmed) || v.emoji() == trimmed
        })
    }
}

impl fmt::Display for Village {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Village {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Village::parse_choice(s).ok_or_else(|| format!("unknown village: {}", s.trim()))
    }
}

/// Clan rarity tier. Each clan carries the integer weight of its tier; selection is
/// proportional to the sum of per-clan weights, not renormalized per tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Legendary,
    Rare,
    Common,
}

impl Rarity {
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Legendary => 5,
            Rarity::Rare => 15,
            Rarity::Common => 80,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Legendary => "legendary",
            Rarity::Rare => "rare",
            Rarity::Common => "common",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable clan definition from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Clan {
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub stat_bonus: BTreeMap<String, i64>,
    #[serde(default)]
    pub special_jutsu: Vec<String>,
}

impl Clan {
    pub fn new(name: &str, description: &str, rarity: Rarity) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rarity,
            stat_bonus: BTreeMap::new(),
            special_jutsu: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, stat: &str, delta: i64) -> Self {
        self.stat_bonus.insert(stat.to_string(), delta);
        self
    }

    pub fn with_jutsu(mut self, jutsu: &str) -> Self {
        self.special_jutsu.push(jutsu.to_string());
        self
    }
}

/// Value copy of a clan at the moment it was assigned to a player.
///
/// `granted_jutsu` lists only the techniques this assignment actually added, so
/// reversing it never strips a technique the player learned some other way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClanAssignment {
    pub clan: Clan,
    #[serde(default)]
    pub granted_jutsu: Vec<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mission {
    pub name: String,
    pub description: String,
    pub rank: String,
    pub required_level: u32,
    pub reward_xp: u64,
    pub reward_ryo: u64,
}

impl Mission {
    pub fn new(name: &str, description: &str, rank: &str, required_level: u32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            rank: rank.to_string(),
            required_level,
            reward_xp: 0,
            reward_ryo: 0,
        }
    }

    pub fn with_rewards(mut self, xp: u64, ryo: u64) -> Self {
        self.reward_xp = xp;
        self.reward_ryo = ryo;
        self
    }
}

/// Mission snapshot held by a player between accept and complete/abandon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActiveMission {
    pub mission: Mission,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub village: Village,
    pub level: u32,
    pub experience: u64,
    pub health: u32,
    pub max_health: u32,
    pub chakra: u32,
    pub max_chakra: u32,
    pub ryo: u64,
    pub stats: StatBlock,
    #[serde(default)]
    pub jutsu: Vec<String>,
    #[serde(default)]
    pub clan: Option<ClanAssignment>,
    #[serde(default)]
    pub active_mission: Option<ActiveMission>,
    pub free_rerolls: u32,
    #[serde(default)]
    pub last_daily: Option<DateTime<Utc>>,
    pub schema_version: u8,
}

impl Player {
    /// Fresh level-1 character with no clan yet.
    pub fn new(id: &str, display_name: &str, village: Village, rules: &GameRules) -> Self {
        let now = Utc::now();
        let base_vitals = rules.base_vitals;
        let stats = BASE_STAT_NAMES
            .iter()
            .map(|name| (name.to_string(), rules.base_stat))
            .collect();
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
            updated_at: now,
            village,
            level: 1,
            experience: 0,
            health: base_vitals,
            max_health: base_vitals,
            chakra: base_vitals,
            max_chakra: base_vitals,
            ryo: rules.starting_ryo,
            stats,
            jutsu: Vec::new(),
            clan: None,
            active_mission: None,
            free_rerolls: rules.free_rerolls,
            last_daily: None,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn knows_jutsu(&self, name: &str) -> bool {
        self.jutsu.iter().any(|j| j == name)
    }

    pub fn clan_name(&self) -> Option<&str> {
        self.clan.as_ref().map(|a| a.clan.name.as_str())
    }

    /// Experience needed to leave the current level.
    pub fn xp_to_next_level(&self) -> u64 {
        crate::game::progression::level_threshold(self.level)
    }

    pub fn rank_title(&self) -> &'static str {
        rank_title(self.level)
    }
}

/// Display-only narrative title for a level.
pub fn rank_title(level: u32) -> &'static str {
    match level {
        0..=4 => "Academy Student",
        5..=9 => "Genin",
        10..=19 => "Chunin",
        20..=34 => "Jonin",
        _ => "Kage-level",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn village_choice_accepts_name_emoji_and_index() {
        assert_eq!(Village::parse_choice("konoha"), Some(Village::Konoha));
        assert_eq!(Village::parse_choice(" SUNA "), Some(Village::Suna));
        assert_eq!(Village::parse_choice("💧"), Some(Village::Kiri));
        assert_eq!(Village::parse_choice("4"), Some(Village::Kumo));
        assert_eq!(Village::parse_choice("0"), None);
        assert_eq!(Village::parse_choice("6"), None);
        assert_eq!(Village::parse_choice("Amegakure"), None);
    }

    #[test]
    fn new_player_has_baseline_values() {
        let p = Player::new("42", "Naruto", Village::Konoha, &GameRules::default());
        assert_eq!(p.level, 1);
        assert_eq!(p.experience, 0);
        assert_eq!((p.health, p.max_health), (100, 100));
        assert_eq!((p.chakra, p.max_chakra), (100, 100));
        assert_eq!(p.stats.len(), BASE_STAT_NAMES.len());
        assert!(p.stats.values().all(|v| *v == 10));
        assert_eq!(p.free_rerolls, 3);
        assert_eq!(p.ryo, 1000);
        assert!(p.clan.is_none());
        assert!(p.active_mission.is_none());
        assert_eq!(p.xp_to_next_level(), 100);
    }

    #[test]
    fn rank_titles_follow_level_bands() {
        assert_eq!(rank_title(1), "Academy Student");
        assert_eq!(rank_title(5), "Genin");
        assert_eq!(rank_title(19), "Chunin");
        assert_eq!(rank_title(20), "Jonin");
        assert_eq!(rank_title(99), "Kage-level");
    }

    #[test]
    fn rarity_weights_are_per_clan_constants() {
        assert_eq!(Rarity::Legendary.weight(), 5);
        assert_eq!(Rarity::Rare.weight(), 15);
        assert_eq!(Rarity::Common.weight(), 80);
    }
}
