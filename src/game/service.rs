//! Game operations bound to a player store.
//!
//! Every mutating call loads the caller's record, works on a copy and writes it
//! back only when the operation succeeded, so a refused command never persists a
//! half-applied change.

use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::actions::{self, DailyReward, HealOutcome};
use crate::game::catalog::Catalog;
use crate::game::clan::{self, RerollOutcome};
use crate::game::errors::GameError;
use crate::game::mission::{self, MissionOutcome};
use crate::game::progression::{grant_experience, LevelUp};
use crate::game::rules::GameRules;
use crate::game::shop::{self, PurchaseOutcome};
use crate::game::storage::PlayerStore;
use crate::game::types::{Clan, Mission, Player, Village};
use crate::logutil::who;
use crate::validation::validate_ninja_name;

pub struct GameService {
    catalog: Catalog,
    rules: GameRules,
    store: Box<dyn PlayerStore>,
    rng: StdRng,
}

impl GameService {
    /// RNG is seeded from `rules.rng_seed` when set, otherwise from entropy.
    pub fn new(catalog: Catalog, rules: GameRules, store: Box<dyn PlayerStore>) -> Self {
        let rng = match rules.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog,
            rules,
            store,
            rng,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn store(&self) -> &dyn PlayerStore {
        self.store.as_ref()
    }

    pub fn has_character(&self, id: &str) -> Result<bool, GameError> {
        self.store.exists(id)
    }

    /// Load, mutate a copy, persist on success.
    fn update<T>(
        &mut self,
        id: &str,
        op: impl FnOnce(&mut Player, &Catalog, &GameRules, &mut StdRng) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut player = self.store.get_player(id)?;
        let out = op(&mut player, &self.catalog, &self.rules, &mut self.rng)?;
        self.store.put_player(player)?;
        Ok(out)
    }

    /// Create a level-1 character with a randomly selected clan.
    pub fn create_character(
        &mut self,
        id: &str,
        name: &str,
        village: Village,
    ) -> Result<Player, GameError> {
        self.create_character_with_clan(id, name, village, None)
    }

    /// Create a level-1 character. `chosen` is the player's pick from
    /// [`GameService::offer_clans`]; `None` draws one at random.
    pub fn create_character_with_clan(
        &mut self,
        id: &str,
        name: &str,
        village: Village,
        chosen: Option<&Clan>,
    ) -> Result<Player, GameError> {
        let name = validate_ninja_name(name)?;
        if self.store.exists(id)? {
            return Err(GameError::AlreadyExists);
        }
        let mut player = Player::new(id, &name, village, &self.rules);
        let clan = match chosen {
            Some(clan) => clan,
            None => clan::select_clan(&self.catalog.clans, &mut self.rng)
                .ok_or_else(|| GameError::InvalidChoice("no clans available".into()))?,
        };
        clan::assign_clan(&mut player, clan);
        self.store.create_player(player.clone())?;
        info!(
            "New ninja {} from {} joined clan {}",
            who(&player.display_name, &player.id),
            player.village,
            player.clan_name().unwrap_or("-")
        );
        Ok(player)
    }

    /// Distinct rarity-weighted clans for the interactive clan step.
    pub fn offer_clans(&mut self) -> Vec<Clan> {
        clan::offer_clans(&self.catalog.clans, self.rules.clan_offers, &mut self.rng)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn profile(&self, id: &str) -> Result<Player, GameError> {
        self.store.get_player(id)
    }

    pub fn reroll_clan(&mut self, id: &str) -> Result<RerollOutcome, GameError> {
        self.update(id, |p, catalog, rules, rng| {
            clan::reroll_clan(p, &catalog.clans, rules, rng)
        })
    }

    pub fn accept_mission(&mut self, id: &str, mission_name: &str) -> Result<Mission, GameError> {
        self.update(id, |p, catalog, _, _| {
            let mission = catalog
                .find_mission(mission_name)
                .ok_or_else(|| {
                    GameError::InvalidChoice(format!("no mission named '{}'", mission_name))
                })?;
            mission::accept_mission(p, mission)?;
            Ok(mission.clone())
        })
    }

    pub fn complete_mission(&mut self, id: &str) -> Result<MissionOutcome, GameError> {
        let outcome =
            self.update(id, |p, _, rules, rng| mission::complete_mission(p, rules, rng))?;
        debug!(
            "mission '{}' for {}: {}",
            outcome.mission().name,
            id,
            if outcome.is_success() { "success" } else { "failure" }
        );
        Ok(outcome)
    }

    pub fn abandon_mission(&mut self, id: &str) -> Result<Mission, GameError> {
        self.update(id, |p, _, _, _| mission::abandon_mission(p))
    }

    pub fn claim_daily(&mut self, id: &str, now: DateTime<Utc>) -> Result<DailyReward, GameError> {
        self.update(id, |p, _, rules, _| actions::claim_daily(p, rules, now))
    }

    pub fn buy(&mut self, id: &str, item_name: &str) -> Result<PurchaseOutcome, GameError> {
        self.update(id, |p, catalog, rules, rng| {
            let item = catalog
                .find_item(item_name)
                .ok_or_else(|| {
                    GameError::InvalidChoice(format!("no item named '{}'", item_name))
                })?;
            shop::purchase(p, item, &catalog.jutsu_pool, rules, rng)
        })
    }

    pub fn heal(&mut self, id: &str) -> Result<HealOutcome, GameError> {
        self.update(id, |p, _, rules, _| actions::heal(p, rules))
    }

    pub fn techniques(&self, id: &str) -> Result<Vec<String>, GameError> {
        Ok(self.store.get_player(id)?.jutsu)
    }

    /// Grant experience to `target`. Authorization is the caller's job.
    pub fn grant_experience(
        &mut self,
        target: &str,
        amount: u64,
    ) -> Result<(Player, Option<LevelUp>), GameError> {
        self.update(target, |p, _, rules, _| {
            let level_up = grant_experience(p, amount, rules);
            Ok((p.clone(), level_up))
        })
    }
}
