mod common;

use common::{say, test_config};
use shinobibot::bot::BotServer;
use shinobibot::config::StorageBackend;
use shinobibot::game::mission::{abandon_mission, accept_mission, complete_mission};
use shinobibot::game::{Catalog, GameError, GameRules, Player, Village};
use rand::rngs::mock::StepRng;
use tempfile::TempDir;

#[test]
fn idle_active_idle() {
    let rules = GameRules::default();
    let catalog = Catalog::builtin();
    let mission = catalog.find_mission("Farm Patrol").unwrap();
    let mut p = Player::new("m1", "Choji", Village::Konoha, &rules);

    accept_mission(&mut p, mission).unwrap();
    assert!(matches!(
        accept_mission(&mut p, mission),
        Err(GameError::MissionAlreadyActive)
    ));

    let mut win = StepRng::new(u64::MAX, 0);
    let outcome = complete_mission(&mut p, &rules, &mut win).unwrap();
    assert!(outcome.is_success());
    assert_eq!(p.ryo, 1150);
    assert_eq!(p.experience, 80);

    accept_mission(&mut p, mission).unwrap();
    assert_eq!(abandon_mission(&mut p).unwrap().name, "Farm Patrol");
    assert_eq!(p.ryo, 1150);
    assert!(matches!(
        abandon_mission(&mut p),
        Err(GameError::NoActiveMission)
    ));
}

#[test]
fn snapshot_survives_catalog_changes() {
    let rules = GameRules::default();
    let mut catalog = Catalog::builtin();
    let mut p = Player::new("m2", "Ino", Village::Konoha, &rules);
    accept_mission(&mut p, catalog.find_mission("Lost Cat").unwrap()).unwrap();

    catalog.missions[0].reward_ryo = 1_000_000;
    let mut win = StepRng::new(u64::MAX, 0);
    complete_mission(&mut p, &rules, &mut win).unwrap();
    assert_eq!(p.ryo, 1100);
}

#[test]
fn chat_commands_drive_the_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let mut server = BotServer::new(&test_config(tmp.path(), StorageBackend::Sled)).unwrap();
    say(&mut server, "shino", "!create konoha");

    let out = say(&mut server, "shino", "!accept Bandit Hideout");
    assert!(out.contains("Level 6 required"), "{}", out);

    let out = say(&mut server, "shino", "!complete");
    assert!(out.contains("No mission in progress"), "{}", out);

    let out = say(&mut server, "shino", "!accept lost cat");
    assert!(out.contains("Accepted D-rank mission: Lost Cat"), "{}", out);
    let out = say(&mut server, "shino", "!accept Farm Patrol");
    assert!(out.contains("already in progress"), "{}", out);

    let out = say(&mut server, "shino", "!complete");
    assert!(out.contains("Lost Cat"), "{}", out);
    let p = server.service().profile("shino").unwrap();
    assert!(p.active_mission.is_none());

    let out = say(&mut server, "shino", "!accept Ramen Delivery");
    assert!(out.contains("no mission named"), "{}", out);
}
