//! Self-heal and the daily reward.

use chrono::{DateTime, Duration, Utc};

use crate::game::errors::GameError;
use crate::game::progression::{grant_experience, LevelUp};
use crate::game::rules::GameRules;
use crate::game::types::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealOutcome {
    pub healed: u32,
    pub health: u32,
    pub max_health: u32,
    pub chakra_left: u32,
}

/// Spend `rules.heal_chakra_cost` chakra to restore up to `rules.heal_amount` health.
/// Chakra is checked before health.
pub fn heal(player: &mut Player, rules: &GameRules) -> Result<HealOutcome, GameError> {
    if player.chakra < rules.heal_chakra_cost {
        return Err(GameError::InsufficientChakra {
            needed: rules.heal_chakra_cost,
            available: player.chakra,
        });
    }
    if player.health >= player.max_health {
        return Err(GameError::AlreadyFullHealth);
    }
    player.chakra -= rules.heal_chakra_cost;
    let before = player.health;
    player.health = player
        .health
        .saturating_add(rules.heal_amount)
        .min(player.max_health);
    Ok(HealOutcome {
        healed: player.health - before,
        health: player.health,
        max_health: player.max_health,
        chakra_left: player.chakra,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyReward {
    pub ryo: u64,
    pub xp: u64,
    pub level_up: Option<LevelUp>,
    pub next_eligible: DateTime<Utc>,
}

/// When the player may claim again, or `None` if a claim is allowed at `now`.
pub fn next_daily_at(player: &Player, rules: &GameRules, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let last = player.last_daily?;
    let next = last + Duration::hours(rules.daily_cooldown_hours);
    (now < next).then_some(next)
}

/// Grant the level-scaled daily ryo and experience once per rolling window.
/// Rewards are computed from the level before the grant.
pub fn claim_daily(
    player: &mut Player,
    rules: &GameRules,
    now: DateTime<Utc>,
) -> Result<DailyReward, GameError> {
    if let Some(next_eligible) = next_daily_at(player, rules, now) {
        return Err(GameError::TooEarly { next_eligible });
    }
    let ryo = rules.daily_ryo(player.level);
    let xp = rules.daily_xp(player.level);
    player.ryo = player.ryo.saturating_add(ryo);
    let level_up = grant_experience(player, xp, rules);
    player.last_daily = Some(now);
    Ok(DailyReward {
        ryo,
        xp,
        level_up,
        next_eligible: now + Duration::hours(rules.daily_cooldown_hours),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Village;

    fn player() -> (Player, GameRules) {
        let rules = GameRules::default();
        (Player::new("8", "Hinata", Village::Konoha, &rules), rules)
    }

    #[test]
    fn heal_with_low_chakra_fails() {
        let (mut p, rules) = player();
        p.chakra = 5;
        p.health = 40;
        let err = heal(&mut p, &rules).unwrap_err();
        assert!(matches!(err, GameError::InsufficientChakra { needed: 10, available: 5 }));
        assert_eq!(p.health, 40);
        assert_eq!(p.chakra, 5);
    }

    #[test]
    fn heal_at_full_health_fails() {
        let (mut p, rules) = player();
        assert!(matches!(heal(&mut p, &rules), Err(GameError::AlreadyFullHealth)));
        assert_eq!(p.chakra, 100);
    }

    #[test]
    fn heal_restores_twenty_capped() {
        let (mut p, rules) = player();
        p.health = 50;
        let out = heal(&mut p, &rules).unwrap();
        assert_eq!(out.healed, 20);
        assert_eq!(p.health, 70);
        assert_eq!(p.chakra, 90);

        p.health = 95;
        let out = heal(&mut p, &rules).unwrap();
        assert_eq!(out.healed, 5);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn daily_claim_then_too_early() {
        let (mut p, rules) = player();
        let now = Utc::now();
        let reward = claim_daily(&mut p, &rules, now).unwrap();
        assert_eq!(reward.ryo, 110);
        assert_eq!(reward.xp, 55);
        assert_eq!(p.ryo, 1110);
        assert_eq!(p.experience, 55);

        let later = now + Duration::hours(23);
        match claim_daily(&mut p, &rules, later) {
            Err(GameError::TooEarly { next_eligible }) => {
                assert_eq!(next_eligible, now + Duration::hours(24));
            }
            other => panic!("expected TooEarly, got {:?}", other),
        }
        assert_eq!(p.ryo, 1110);

        let next_day = now + Duration::hours(24);
        claim_daily(&mut p, &rules, next_day).unwrap();
        assert_eq!(p.ryo, 1220);
    }

    #[test]
    fn daily_experience_can_level_up() {
        let (mut p, rules) = player();
        p.experience = 60;
        let reward = claim_daily(&mut p, &rules, Utc::now()).unwrap();
        assert_eq!(reward.level_up.map(|l| l.to_level), Some(2));
        assert_eq!(p.experience, 15);
    }
}
