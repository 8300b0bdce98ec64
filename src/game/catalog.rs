//! Static game content: clans, missions, shop items and the scroll technique pool.
//!
//! The catalog is built once at startup, either from the built-in tables below or
//! from a JSON file whose sections replace the matching built-ins. It is never
//! mutated afterwards; game operations borrow it read-only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::game::errors::GameError;
use crate::game::shop::{ItemEffect, ShopItem};
use crate::game::types::{Clan, Mission, Rarity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub clans: Vec<Clan>,
    pub missions: Vec<Mission>,
    pub shop: Vec<ShopItem>,
    /// Techniques a Jutsu Scroll can teach.
    pub jutsu_pool: Vec<String>,
}

/// On-disk override format. Any section left out keeps the built-in content.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    clans: Option<Vec<Clan>>,
    #[serde(default)]
    missions: Option<Vec<Mission>>,
    #[serde(default)]
    shop: Option<Vec<ShopItem>>,
    #[serde(default)]
    jutsu_pool: Option<Vec<String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            clans: builtin_clans(),
            missions: builtin_missions(),
            shop: builtin_shop(),
            jutsu_pool: [
                "Katon: Goukakyuu",
                "Suiton: Mizurappa",
                "Doton: Doryuuheki",
                "Fuuton: Daitoppa",
                "Raiton: Chidori",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Load a catalog from a JSON file, falling back to built-ins per section.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&contents)?;

        let mut catalog = Self::builtin();
        if let Some(clans) = file.clans {
            catalog.clans = clans;
        }
        if let Some(missions) = file.missions {
            catalog.missions = missions;
        }
        if let Some(shop) = file.shop {
            catalog.shop = shop;
        }
        if let Some(pool) = file.jutsu_pool {
            catalog.jutsu_pool = pool;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs the game cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.clans.is_empty() {
            return Err(GameError::InvalidChoice("catalog has no clans".into()));
        }
        check_unique("clan", self.clans.iter().map(|c| c.name.as_str()))?;
        check_unique("mission", self.missions.iter().map(|m| m.name.as_str()))?;
        check_unique("shop item", self.shop.iter().map(|i| i.name.as_str()))?;
        let has_scroll = self
            .shop
            .iter()
            .any(|i| matches!(i.effect, ItemEffect::LearnTechnique));
        if has_scroll && self.jutsu_pool.is_empty() {
            return Err(GameError::InvalidChoice(
                "shop sells a technique scroll but the jutsu pool is empty".into(),
            ));
        }
        Ok(())
    }

    pub fn find_mission(&self, name: &str) -> Option<&Mission> {
        let needle = name.trim();
        self.missions
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(needle))
    }

    pub fn find_item(&self, name: &str) -> Option<&ShopItem> {
        let needle = name.trim();
        self.shop.iter().find(|i| i.name.eq_ignore_ascii_case(needle))
    }

    pub fn clans_of(&self, rarity: Rarity) -> impl Iterator<Item = &Clan> {
        self.clans.iter().filter(move |c| c.rarity == rarity)
    }
}

fn check_unique<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), GameError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(GameError::InvalidChoice(format!(
                "duplicate {} in catalog: {}",
                kind, name
            )));
        }
    }
    Ok(())
}

fn builtin_clans() -> Vec<Clan> {
    vec![
        Clan::new("Uchiha", "Clan of the Sharingan", Rarity::Legendary)
            .with_bonus("ninjutsu", 15)
            .with_bonus("intelligence", 10)
            .with_jutsu("Katon: Goukakyuu no Jutsu")
            .with_jutsu("Sharingan"),
        Clan::new("Hyuga", "Clan of the Byakugan", Rarity::Legendary)
            .with_bonus("taijutsu", 15)
            .with_bonus("speed", 10)
            .with_jutsu("Juken")
            .with_jutsu("Byakugan"),
        Clan::new("Senju", "Clan of the Will of Fire", Rarity::Legendary)
            .with_bonus("strength", 15)
            .with_bonus("ninjutsu", 10)
            .with_jutsu("Mokuton: Jukai Kotan"),
        Clan::new("Nara", "Clan of shadows", Rarity::Rare)
            .with_bonus("intelligence", 20)
            .with_bonus("genjutsu", 5)
            .with_jutsu("Kagemane no Jutsu"),
        Clan::new("Akimichi", "Clan of expansion", Rarity::Rare)
            .with_bonus("strength", 20)
            .with_bonus("taijutsu", 5)
            .with_jutsu("Baika no Jutsu"),
        Clan::new("Yamanaka", "Clan of the mind", Rarity::Rare)
            .with_bonus("intelligence", 15)
            .with_bonus("genjutsu", 10)
            .with_jutsu("Shintenshin no Jutsu"),
        Clan::new("Inuzuka", "Clan of the ninja hounds", Rarity::Rare)
            .with_bonus("speed", 15)
            .with_bonus("taijutsu", 10)
            .with_jutsu("Gatsuga"),
        Clan::new("Aburame", "Clan of the insects", Rarity::Rare)
            .with_bonus("intelligence", 15)
            .with_bonus("ninjutsu", 10)
            .with_jutsu("Kikaichu no Jutsu"),
        Clan::new("Sarutobi", "Clan of the Hokage", Rarity::Common)
            .with_bonus("ninjutsu", 10)
            .with_bonus("intelligence", 5)
            .with_jutsu("Katon: Endan"),
        Clan::new("Hatake", "Clan of the white fang", Rarity::Common)
            .with_bonus("speed", 10)
            .with_bonus("taijutsu", 5)
            .with_jutsu("Chidori"),
        Clan::new("Shimura", "Clan of the root", Rarity::Common)
            .with_bonus("intelligence", 8)
            .with_bonus("ninjutsu", 7)
            .with_jutsu("Futon: Shinkuugyoku"),
        Clan::new("Mitarashi", "Clan of the serpent", Rarity::Common)
            .with_bonus("speed", 8)
            .with_bonus("genjutsu", 7)
            .with_jutsu("Sen'eijashu"),
        Clan::new("Morino", "Clan of interrogation", Rarity::Common)
            .with_bonus("intelligence", 10)
            .with_bonus("genjutsu", 5)
            .with_jutsu("Kanashibari no Jutsu"),
        Clan::new("Clanless", "Civilian-born ninja", Rarity::Common),
    ]
}

fn builtin_missions() -> Vec<Mission> {
    vec![
        Mission::new(
            "Lost Cat",
            "Track down the daimyo's wife's runaway cat.",
            "D-rank",
            1,
        )
        .with_rewards(50, 100),
        Mission::new(
            "Farm Patrol",
            "Keep crop thieves away from the village fields.",
            "D-rank",
            1,
        )
        .with_rewards(80, 150),
        Mission::new(
            "Merchant Escort",
            "Escort a merchant caravan to the next town.",
            "C-rank",
            3,
        )
        .with_rewards(150, 300),
        Mission::new(
            "Bandit Hideout",
            "Clear out a bandit camp threatening the trade road.",
            "B-rank",
            6,
        )
        .with_rewards(400, 800),
        Mission::new(
            "Rogue Ninja Hunt",
            "Capture a missing-nin spotted near the border.",
            "A-rank",
            10,
        )
        .with_rewards(900, 2000),
        Mission::new(
            "Daimyo Protection",
            "Guard the Fire Daimyo during the summit.",
            "S-rank",
            20,
        )
        .with_rewards(2500, 6000),
    ]
}

fn builtin_shop() -> Vec<ShopItem> {
    vec![
        ShopItem::new("Healing Potion", 50, ItemEffect::RestoreHealth(50)),
        ShopItem::new("Chakra Potion", 50, ItemEffect::RestoreChakra(50)),
        ShopItem::new("Wisdom Elixir", 100, ItemEffect::GrantExperience(10)),
        ShopItem::new("Jutsu Scroll", 150, ItemEffect::LearnTechnique),
    ]
}
