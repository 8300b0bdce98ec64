//! Clan selection, bonus application and rerolls.
//!
//! Every clan is drawn with the fixed integer weight of its rarity tier
//! (legendary 5, rare 15, common 80). Weights are per clan, so a tier with more
//! members claims a larger share of the total.

use chrono::Utc;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::game::errors::GameError;
use crate::game::rules::GameRules;
use crate::game::types::{Clan, ClanAssignment, Player};

/// Pick one clan from `clans` proportionally to [`crate::game::Rarity::weight`].
/// Returns `None` only for an empty slice.
pub fn select_clan<'a, R: Rng + ?Sized>(clans: &'a [Clan], rng: &mut R) -> Option<&'a Clan> {
    let weights = clans.iter().map(|c| c.rarity.weight());
    let dist = WeightedIndex::new(weights).ok()?;
    clans.get(dist.sample(rng))
}

/// Draw up to `count` distinct clans, each pick weighted like [`select_clan`]
/// over the clans not drawn yet. Used to build the interactive clan choice.
pub fn offer_clans<'a, R: Rng + ?Sized>(
    clans: &'a [Clan],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Clan> {
    let mut pool: Vec<&Clan> = clans.iter().collect();
    let mut offers = Vec::with_capacity(count.min(pool.len()));
    while offers.len() < count {
        let Ok(dist) = WeightedIndex::new(pool.iter().map(|c| c.rarity.weight())) else {
            break;
        };
        offers.push(pool.swap_remove(dist.sample(rng)));
    }
    offers
}

/// Add the clan's stat deltas and teach its techniques the player does not know yet.
/// The returned assignment remembers exactly which techniques were added.
pub fn apply_clan_bonus(player: &mut Player, clan: &Clan) -> ClanAssignment {
    for (stat, delta) in &clan.stat_bonus {
        *player.stats.entry(stat.clone()).or_insert(0) += delta;
    }

    let mut granted = Vec::new();
    for jutsu in &clan.special_jutsu {
        if !player.knows_jutsu(jutsu) {
            player.jutsu.push(jutsu.clone());
            granted.push(jutsu.clone());
        }
    }

    ClanAssignment {
        clan: clan.clone(),
        granted_jutsu: granted,
        assigned_at: Utc::now(),
    }
}

/// Exact inverse of [`apply_clan_bonus`] for the same assignment.
pub fn remove_clan_bonus(player: &mut Player, assignment: &ClanAssignment) {
    for (stat, delta) in &assignment.clan.stat_bonus {
        *player.stats.entry(stat.clone()).or_insert(0) -= delta;
    }
    player
        .jutsu
        .retain(|known| !assignment.granted_jutsu.contains(known));
}

/// Replace whatever clan the player holds with `clan`, reversing the old bonus first.
/// Returns the previous assignment, if any.
pub fn assign_clan(player: &mut Player, clan: &Clan) -> Option<ClanAssignment> {
    let previous = player.clan.take();
    if let Some(ref old) = previous {
        remove_clan_bonus(player, old);
    }
    player.clan = Some(apply_clan_bonus(player, clan));
    previous
}

/// How a reroll was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerollPayment {
    Free { remaining: u32 },
    Paid { cost: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RerollOutcome {
    pub previous: Option<Clan>,
    pub new_clan: Clan,
    pub payment: RerollPayment,
}

/// Swap the player's clan for a freshly drawn one.
///
/// Consumes a free reroll when one is left, otherwise charges `rules.reroll_cost`.
/// Fails with [`GameError::InsufficientFunds`] before touching anything if the
/// player can pay neither way.
pub fn reroll_clan<R: Rng + ?Sized>(
    player: &mut Player,
    clans: &[Clan],
    rules: &GameRules,
    rng: &mut R,
) -> Result<RerollOutcome, GameError> {
    if player.free_rerolls == 0 && player.ryo < rules.reroll_cost {
        return Err(GameError::InsufficientFunds {
            needed: rules.reroll_cost,
            available: player.ryo,
        });
    }
    let new_clan = select_clan(clans, rng)
        .ok_or_else(|| GameError::InvalidChoice("no clans available".into()))?
        .clone();

    let payment = if player.free_rerolls > 0 {
        player.free_rerolls -= 1;
        RerollPayment::Free {
            remaining: player.free_rerolls,
        }
    } else {
        player.ryo -= rules.reroll_cost;
        RerollPayment::Paid {
            cost: rules.reroll_cost,
        }
    };

    let previous = assign_clan(player, &new_clan).map(|a| a.clan);
    debug!(
        "clan reroll: player={} {:?} -> {} ({:?})",
        player.id,
        previous.as_ref().map(|c| c.name.as_str()),
        new_clan.name,
        payment
    );
    Ok(RerollOutcome {
        previous,
        new_clan,
        payment,
    })
}
