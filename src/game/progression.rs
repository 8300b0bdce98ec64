//! Experience and level-up arithmetic.
//!
//! Leaving level `n` costs exactly `n * 100` experience. A single grant can cross
//! several levels; each crossed level costs its own threshold, so the price grows
//! with every step.

use crate::game::rules::GameRules;
use crate::game::types::Player;

/// Experience consumed to advance from `level` to `level + 1`.
pub fn level_threshold(level: u32) -> u64 {
    level as u64 * 100
}

/// Summary of a grant, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from_level: u32,
    pub to_level: u32,
}

impl LevelUp {
    pub fn levels_gained(&self) -> u32 {
        self.to_level - self.from_level
    }
}

/// Experience needed to climb `count` levels starting at `level`:
/// `100 * (level + (level + 1) + ... + (level + count - 1))`.
fn cost_of_levels(level: u32, count: u32) -> u128 {
    let (l, k) = (level as u128, count as u128);
    100 * (k * l + k * k.saturating_sub(1) / 2)
}

/// Largest number of levels `pool` pays for from `level`, bounded by `u32::MAX`.
fn levels_paid_for(level: u32, pool: u128) -> u32 {
    let (mut lo, mut hi) = (0u32, u32::MAX - level);
    while lo < hi {
        let mid = lo + (hi - lo) / 2 + 1;
        if cost_of_levels(level, mid) <= pool {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Add `amount` experience and resolve every level-up it pays for.
///
/// Each level gained raises max health and max chakra by `rules.vitals_per_level`
/// (saturating at `u32::MAX`) and refills both to the new maximum. Returns `Some`
/// if at least one level was gained. On return
/// `player.experience < level_threshold(player.level)`, except at level
/// `u32::MAX` where the surplus is kept, clamped to `u64::MAX`.
///
/// The level count is solved directly instead of stepping one level at a time,
/// so any `u64` amount resolves in a few dozen iterations.
pub fn grant_experience(player: &mut Player, amount: u64, rules: &GameRules) -> Option<LevelUp> {
    let from_level = player.level;
    let pool = player.experience as u128 + amount as u128;
    let gained = levels_paid_for(from_level, pool);
    let left = pool - cost_of_levels(from_level, gained);

    player.experience = u64::try_from(left).unwrap_or(u64::MAX);
    if gained == 0 {
        return None;
    }

    player.level = from_level + gained;
    let growth = rules.vitals_per_level.saturating_mul(gained);
    player.max_health = player.max_health.saturating_add(growth);
    player.max_chakra = player.max_chakra.saturating_add(growth);
    player.health = player.max_health;
    player.chakra = player.max_chakra;

    Some(LevelUp {
        from_level,
        to_level: player.level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Village;

    fn fresh() -> (Player, GameRules) {
        let rules = GameRules::default();
        (Player::new("1", "Lee", Village::Konoha, &rules), rules)
    }

    #[test]
    fn grant_below_threshold_does_not_level() {
        let (mut p, rules) = fresh();
        assert_eq!(grant_experience(&mut p, 99, &rules), None);
        assert_eq!(p.level, 1);
        assert_eq!(p.experience, 99);
        assert_eq!(p.max_health, 100);
    }

    #[test]
    fn grant_250_from_level_one_reaches_level_two_with_150_left() {
        let (mut p, rules) = fresh();
        let up = grant_experience(&mut p, 250, &rules).expect("level up");
        assert_eq!(up, LevelUp { from_level: 1, to_level: 2 });
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 150);
        assert_eq!(p.max_health, 110);
        assert_eq!(p.max_chakra, 110);
    }

    #[test]
    fn one_grant_can_cross_several_levels() {
        let (mut p, rules) = fresh();
        // 100 (1->2) + 200 (2->3) + 300 (3->4) = 600, 50 left over
        let up = grant_experience(&mut p, 650, &rules).expect("level up");
        assert_eq!(up.levels_gained(), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 50);
        assert_eq!(p.max_health, 130);
    }

    #[test]
    fn level_up_refills_vitals() {
        let (mut p, rules) = fresh();
        p.health = 12;
        p.chakra = 0;
        grant_experience(&mut p, 100, &rules);
        assert_eq!(p.health, p.max_health);
        assert_eq!(p.chakra, p.max_chakra);
        assert_eq!(p.experience, 0);
    }

    #[test]
    fn experience_stays_below_threshold_for_many_grants() {
        let (mut p, rules) = fresh();
        let mut last_level = p.level;
        for amount in [0u64, 1, 7, 99, 100, 101, 333, 1_000, 12_345, 5] {
            grant_experience(&mut p, amount, &rules);
            assert!(p.experience < level_threshold(p.level));
            assert!(p.level >= last_level);
            assert!(p.health <= p.max_health);
            last_level = p.level;
        }
    }

    #[test]
    fn largest_grant_keeps_every_point_and_saturates_vitals() {
        let (mut p, rules) = fresh();
        let up = grant_experience(&mut p, u64::MAX, &rules).expect("level up");
        assert_eq!(up.from_level, 1);
        assert!(p.experience < level_threshold(p.level));
        // nothing is lost: climbed levels plus leftover add back up to the grant
        let spent = cost_of_levels(1, p.level - 1);
        assert_eq!(spent + p.experience as u128, u64::MAX as u128);
        assert_eq!(p.max_health, u32::MAX);
        assert_eq!(p.max_chakra, u32::MAX);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn repeated_huge_grants_never_overflow() {
        let (mut p, rules) = fresh();
        let mut last_level = p.level;
        for _ in 0..4 {
            grant_experience(&mut p, u64::MAX, &rules);
            assert!(p.level > last_level);
            assert!(p.experience < level_threshold(p.level));
            last_level = p.level;
        }
    }

    #[test]
    fn closed_form_matches_level_by_level_costs() {
        let stepped: u128 = (3..3 + 7).map(|l| level_threshold(l) as u128).sum();
        assert_eq!(cost_of_levels(3, 7), stepped);
        assert_eq!(cost_of_levels(5, 0), 0);
        assert_eq!(levels_paid_for(1, 299), 1);
        assert_eq!(levels_paid_for(1, 300), 2);
    }
}
