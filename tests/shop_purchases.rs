mod common;

use common::{say, test_config};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shinobibot::bot::BotServer;
use shinobibot::config::StorageBackend;
use shinobibot::game::actions::heal;
use shinobibot::game::shop::{purchase, PurchaseEffect};
use shinobibot::game::{Catalog, GameError, GameRules, Player, Village};
use tempfile::TempDir;

#[test]
fn insufficient_funds_never_mutates() {
    let rules = GameRules::default();
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(3);
    for item in &catalog.shop {
        let mut p = Player::new("s1", "Tenten", Village::Konoha, &rules);
        p.ryo = item.price - 1;
        p.health = 10;
        let before = p.clone();
        let err = purchase(&mut p, item, &catalog.jutsu_pool, &rules, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }), "{}", item.name);
        assert_eq!(p, before, "{} mutated the player", item.name);
    }
}

#[test]
fn buying_every_scroll_technique_eventually() {
    let rules = GameRules::default();
    let catalog = Catalog::builtin();
    let mut rng = StdRng::seed_from_u64(8);
    let scroll = catalog.find_item("Jutsu Scroll").unwrap();
    let mut p = Player::new("s2", "Rin", Village::Konoha, &rules);
    p.ryo = 150 * 200;
    let mut duplicates = 0;
    for _ in 0..200 {
        match purchase(&mut p, scroll, &catalog.jutsu_pool, &rules, &mut rng)
            .unwrap()
            .effect
        {
            PurchaseEffect::AlreadyKnewJutsu(_) => duplicates += 1,
            PurchaseEffect::LearnedJutsu(_) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(p.ryo, 0);
    assert_eq!(p.jutsu.len(), catalog.jutsu_pool.len());
    assert_eq!(duplicates, 200 - catalog.jutsu_pool.len());
}

#[test]
fn heal_with_five_chakra_is_refused() {
    let rules = GameRules::default();
    let mut p = Player::new("s3", "Shizune", Village::Konoha, &rules);
    p.chakra = 5;
    p.health = 30;
    assert!(matches!(
        heal(&mut p, &rules),
        Err(GameError::InsufficientChakra { needed: 10, available: 5 })
    ));
    assert_eq!(p.health, 30);
}

#[test]
fn shop_over_chat() {
    let tmp = TempDir::new().unwrap();
    let mut server = BotServer::new(&test_config(tmp.path(), StorageBackend::Json)).unwrap();
    say(&mut server, "gai", "!create 1");

    let out = say(&mut server, "gai", "!shop");
    assert!(out.contains("Jutsu Scroll - 150 ryo"), "{}", out);

    let out = say(&mut server, "gai", "!buy wisdom elixir");
    assert!(out.contains("Bought Wisdom Elixir for 100 ryo (900 left)"), "{}", out);

    let out = say(&mut server, "gai", "!buy Ramen");
    assert!(out.contains("no item named"), "{}", out);

    let out = say(&mut server, "gai", "!heal");
    assert!(out.contains("Already at full health"), "{}", out);

    let p = server.service().profile("gai").unwrap();
    assert_eq!(p.ryo, 900);
    assert_eq!(p.experience, 10);
}
