use std::collections::BTreeMap;

use shinobibot::game::clan::assign_clan;
use shinobibot::game::{
    Catalog, GameError, GameRules, JsonPlayerStore, Player, PlayerStore, SledPlayerStoreBuilder,
    Village,
};
use tempfile::TempDir;

fn sample(id: &str) -> Player {
    let catalog = Catalog::builtin();
    let mut p = Player::new(id, "Yamato", Village::Konoha, &GameRules::default());
    assign_clan(&mut p, &catalog.clans[2]);
    p.jutsu.push("Katon: Goukakyuu".into());
    p
}

fn round_trip(store: &dyn PlayerStore) {
    let original = sample("a");
    store.create_player(original.clone()).unwrap();
    let loaded = store.get_player("a").unwrap();
    assert_eq!(loaded.clan, original.clan);
    assert_eq!(loaded.stats, original.stats);
    assert_eq!(loaded.jutsu, original.jutsu);

    let mut all = BTreeMap::new();
    all.insert("b".to_string(), sample("b"));
    all.insert("c".to_string(), sample("c"));
    store.save_all(&all).unwrap();
    assert!(matches!(store.get_player("a"), Err(GameError::NotFound(_))));
    assert_eq!(store.load_all().unwrap().len(), 2);
}

#[test]
fn sled_backend_round_trips_clan_snapshot() {
    let tmp = TempDir::new().unwrap();
    let store = SledPlayerStoreBuilder::new(tmp.path().join("players.db"))
        .open()
        .unwrap();
    round_trip(&store);
}

#[test]
fn json_backend_round_trips_clan_snapshot() {
    let tmp = TempDir::new().unwrap();
    let store = JsonPlayerStore::open(tmp.path()).unwrap();
    round_trip(&store);
}

#[test]
fn json_writers_from_threads_do_not_lose_players() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().to_path_buf();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dir = dir.clone();
            std::thread::spawn(move || {
                let store = JsonPlayerStore::open(&dir).unwrap();
                store.create_player(sample(&format!("t{}", i))).unwrap();
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let store = JsonPlayerStore::open(&dir).unwrap();
    assert_eq!(store.list_player_ids().unwrap().len(), 8);
}
