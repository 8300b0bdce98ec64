//! Mission lifecycle: Idle -> Active on accept, back to Idle on complete or abandon.
//!
//! A player holds at most one mission, stored as a value snapshot so catalog edits
//! never change a mission already in progress.

use chrono::Utc;
use rand::Rng;

use crate::game::errors::GameError;
use crate::game::progression::{grant_experience, LevelUp};
use crate::game::rules::GameRules;
use crate::game::types::{ActiveMission, Mission, Player};

#[derive(Debug, Clone, PartialEq)]
pub enum MissionOutcome {
    Success {
        mission: Mission,
        xp: u64,
        ryo: u64,
        level_up: Option<LevelUp>,
    },
    Failure {
        mission: Mission,
    },
}

impl MissionOutcome {
    pub fn mission(&self) -> &Mission {
        match self {
            MissionOutcome::Success { mission, .. } | MissionOutcome::Failure { mission } => {
                mission
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MissionOutcome::Success { .. })
    }
}

pub fn accept_mission(player: &mut Player, mission: &Mission) -> Result<(), GameError> {
    if player.active_mission.is_some() {
        return Err(GameError::MissionAlreadyActive);
    }
    if player.level < mission.required_level {
        return Err(GameError::LevelTooLow {
            required: mission.required_level,
            current: player.level,
        });
    }
    player.active_mission = Some(ActiveMission {
        mission: mission.clone(),
        accepted_at: Utc::now(),
    });
    Ok(())
}

/// Resolve the active mission.
///
/// A uniform draw in `[0, 1)` strictly above `rules.mission_failure_threshold`
/// succeeds and pays the snapshot's rewards (possibly levelling up); anything at or
/// below it fails with no reward. Either way the player returns to Idle.
pub fn complete_mission<R: Rng + ?Sized>(
    player: &mut Player,
    rules: &GameRules,
    rng: &mut R,
) -> Result<MissionOutcome, GameError> {
    let active = player
        .active_mission
        .take()
        .ok_or(GameError::NoActiveMission)?;
    let mission = active.mission;

    let roll: f64 = rng.gen();
    if roll > rules.mission_failure_threshold {
        player.ryo = player.ryo.saturating_add(mission.reward_ryo);
        let level_up = grant_experience(player, mission.reward_xp, rules);
        Ok(MissionOutcome::Success {
            xp: mission.reward_xp,
            ryo: mission.reward_ryo,
            level_up,
            mission,
        })
    } else {
        Ok(MissionOutcome::Failure { mission })
    }
}

/// Drop the active mission without penalty. Returns the abandoned mission.
pub fn abandon_mission(player: &mut Player) -> Result<Mission, GameError> {
    player
        .active_mission
        .take()
        .map(|a| a.mission)
        .ok_or(GameError::NoActiveMission)
}
