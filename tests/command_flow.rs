mod common;

use std::time::Duration;

use common::{say, test_config};
use shinobibot::bot::{BotServer, ChatMessage};
use shinobibot::config::StorageBackend;
use shinobibot::game::Village;
use tempfile::TempDir;

fn server(tmp: &TempDir) -> BotServer {
    BotServer::new(&test_config(tmp.path(), StorageBackend::Sled)).unwrap()
}

#[test]
fn interactive_creation_walks_village_clan_then_name() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);

    let out = say(&mut s, "u1", "!start");
    assert!(out.contains("Choose your village"), "{}", out);

    let out = say(&mut s, "u1", "Atlantis");
    assert!(out.contains("is not a village"), "{}", out);

    let clan_prompt = say(&mut s, "u1", "💧");
    assert!(clan_prompt.contains("Kiri it is"), "{}", clan_prompt);
    assert!(clan_prompt.contains("Choose your clan"), "{}", clan_prompt);
    let first_offer = clan_prompt
        .lines()
        .find(|l| l.starts_with("1. "))
        .expect("numbered offers")
        .to_string();
    assert!(clan_prompt.lines().any(|l| l.starts_with("3. ")));

    let out = say(&mut s, "u1", "9");
    assert!(out.contains("not one of the offered clans"), "{}", out);
    assert!(out.contains(&first_offer), "offers must not change: {}", out);

    let out = say(&mut s, "u1", "1");
    assert!(out.contains("what is your ninja name"), "{}", out);

    let out = say(&mut s, "u1", "x");
    assert!(out.contains("too short"), "{}", out);

    let out = say(&mut s, "u1", "Haku");
    assert!(out.contains("Welcome, Haku of 💧 Kiri"), "{}", out);

    let p = s.service().profile("u1").unwrap();
    assert_eq!(p.display_name, "Haku");
    assert_eq!(p.village, Village::Kiri);
    assert_eq!(p.free_rerolls, 3);
    let clan = p.clan_name().expect("clan assigned");
    assert!(first_offer.contains(clan), "{} not in {}", clan, first_offer);

    // flow is over: plain text is just chat again
    assert_eq!(say(&mut s, "u1", "hello"), "");
    let out = say(&mut s, "u1", "!start");
    assert!(out.contains("already have a character"), "{}", out);
}

#[test]
fn commands_work_while_a_flow_is_pending() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);
    say(&mut s, "u2", "!start");

    let out = say(&mut s, "u2", "!clans");
    assert!(out.contains("Uchiha"), "{}", out);

    let out = say(&mut s, "u2", "3");
    assert!(out.contains("Kiri it is"), "{}", out);

    let out = say(&mut s, "u2", "!cancel");
    assert!(out.contains("cancelled"), "{}", out);
    assert_eq!(say(&mut s, "u2", "Zabuza"), "");
    assert!(!s.service().has_character("u2").unwrap());
}

#[test]
fn stalled_flow_times_out_and_persists_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut config = test_config(tmp.path(), StorageBackend::Sled);
    config.bot.flow_timeout_secs = 1;
    let mut s = BotServer::new(&config).unwrap();

    say(&mut s, "u3", "!start");
    let out = say(&mut s, "u3", "2");
    assert!(out.contains("Choose your clan"), "{}", out);
    std::thread::sleep(Duration::from_millis(1100));

    // the clan step expired, so even a valid answer is too late
    let out = say(&mut s, "u3", "1");
    assert!(out.contains("timed out"), "{}", out);
    assert!(out.contains("!start"), "{}", out);
    assert!(!s.service().has_character("u3").unwrap());

    // a second expiry is noticed by housekeeping instead
    say(&mut s, "u4", "!start");
    std::thread::sleep(Duration::from_millis(1100));
    let notices = s.housekeeping();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].to, "u4");
}

#[test]
fn reroll_and_daily_over_chat() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);
    say(&mut s, "u5", "!create suna");

    for remaining in [2, 1, 0] {
        let out = say(&mut s, "u5", "!reroll");
        assert!(
            out.contains(&format!("free reroll, {} left", remaining)),
            "{}",
            out
        );
    }
    for _ in 0..2 {
        let out = say(&mut s, "u5", "!reroll");
        assert!(out.contains("paid 500 ryo"), "{}", out);
    }
    let out = say(&mut s, "u5", "!reroll");
    assert!(out.contains("Insufficient funds"), "{}", out);
    assert_eq!(s.service().profile("u5").unwrap().ryo, 0);

    let out = say(&mut s, "u5", "!daily");
    assert!(out.contains("+110 ryo, +55 XP"), "{}", out);
    let out = say(&mut s, "u5", "!daily");
    assert!(out.contains("Come back in 23h"), "{}", out);
}

#[test]
fn profile_of_another_user_and_jutsu_list() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);
    say(&mut s, "itachi", "!create kiri");
    let out = say(&mut s, "kisame", "!profile @itachi");
    assert!(out.contains("itachi - Academy Student (Lv 1)"), "{}", out);
    let out = say(&mut s, "kisame", "!profile @nobody");
    assert!(out.contains("nobody has no character"), "{}", out);
    let out = say(&mut s, "kisame", "!profile");
    assert!(out.contains("No character found"), "{}", out);

    let out = say(&mut s, "itachi", "!jutsu");
    let clan_jutsu = s.service().profile("itachi").unwrap().jutsu;
    if clan_jutsu.is_empty() {
        assert!(out.contains("don't know any jutsu"), "{}", out);
    } else {
        assert!(out.contains(&clan_jutsu[0]), "{}", out);
    }
}

fn say_as(server: &mut BotServer, user: &str, display_name: &str, text: &str) -> String {
    server
        .handle_message(&ChatMessage::new(user, display_name, text))
        .unwrap()
        .into_iter()
        .map(|r| r.text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn one_step_create_cleans_long_display_names() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);
    let out = say_as(&mut s, "77", "@Kakashi Hatake of the Hidden Leaf", "!create konoha");
    assert!(out.contains("Welcome, Kakashi Hatake of th"), "{}", out);
    assert_eq!(
        s.service().profile("77").unwrap().display_name,
        "Kakashi Hatake of th"
    );
}

#[test]
fn unusable_display_name_falls_back_to_name_prompt() {
    let tmp = TempDir::new().unwrap();
    let mut s = server(&tmp);

    let out = say_as(&mut s, "42", "J", "!create konoha");
    assert!(out.contains("'J' can't be used as a ninja name"), "{}", out);
    assert!(out.contains("What is your ninja name"), "{}", out);
    assert!(!s.service().has_character("42").unwrap());

    let out = say_as(&mut s, "42", "J", "Jiraiya");
    assert!(out.contains("Welcome, Jiraiya of 🍃 Konoha"), "{}", out);
    let p = s.service().profile("42").unwrap();
    assert_eq!(p.village, Village::Konoha);
    assert!(p.clan.is_some());

    let out = say_as(&mut s, "43", "Admin", "!create suna");
    assert!(out.contains("'Admin' can't be used"), "{}", out);
    let out = say_as(&mut s, "42", "J", "!create suna");
    assert!(out.contains("already have a character"), "{}", out);
}
