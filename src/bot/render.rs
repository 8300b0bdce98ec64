//! Plain-text rendering of game state and outcomes for chat replies.

use chrono::{DateTime, Utc};

use crate::game::actions::{DailyReward, HealOutcome};
use crate::game::clan::{RerollOutcome, RerollPayment};
use crate::game::mission::MissionOutcome;
use crate::game::progression::LevelUp;
use crate::game::shop::{PurchaseEffect, PurchaseOutcome};
use crate::game::{Catalog, Clan, GameError, Mission, Player, Rarity, Village};

fn rarity_badge(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Legendary => "🌟",
        Rarity::Rare => "✨",
        Rarity::Common => "⚪",
    }
}

fn level_up_line(level_up: Option<LevelUp>) -> String {
    match level_up {
        Some(up) if up.levels_gained() > 1 => format!(
            "\n🎉 LEVEL UP x{}! You are now level {}.",
            up.levels_gained(),
            up.to_level
        ),
        Some(up) => format!("\n🎉 LEVEL UP! You are now level {}.", up.to_level),
        None => String::new(),
    }
}

pub fn help(prefix: &str) -> String {
    let rows = [
        ("start", "create a character step by step"),
        ("create <village>", "create a character in one go"),
        ("profile [@user]", "show a ninja profile"),
        ("clans", "list clans and rarities"),
        ("reroll", "reroll your clan"),
        ("missions", "list missions"),
        ("accept <mission>", "take a mission"),
        ("complete", "attempt your mission"),
        ("abandon", "drop your mission"),
        ("daily", "claim the daily reward"),
        ("shop", "list shop items"),
        ("buy <item>", "buy an item"),
        ("heal", "spend chakra to heal"),
        ("jutsu", "list your techniques"),
    ];
    let mut out = String::from("📜 Commands:\n");
    for (cmd, what) in rows {
        out.push_str(&format!("{}{} - {}\n", prefix, cmd, what));
    }
    out.trim_end().to_string()
}

pub fn village_prompt(prefix: &str) -> String {
    let mut out = String::from("🏯 Choose your village (name, emoji or number):\n");
    for (i, v) in Village::ALL.iter().enumerate() {
        out.push_str(&format!("{}. {} {}\n", i + 1, v.emoji(), v.name()));
    }
    out.push_str(&format!("Type {}cancel to stop.", prefix));
    out
}

fn clan_choices(offers: &[Clan]) -> String {
    offers
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} {} ({}) - {}",
                i + 1,
                rarity_badge(c.rarity),
                c.name,
                c.rarity,
                c.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn clan_prompt(village: Village, offers: &[Clan]) -> String {
    format!(
        "{} {} it is. Choose your clan (number or name):\n{}",
        village.emoji(),
        village.name(),
        clan_choices(offers)
    )
}

pub fn clan_reprompt(answer: &str, offers: &[Clan]) -> String {
    format!(
        "❌ '{}' is not one of the offered clans. Pick one:\n{}",
        answer,
        clan_choices(offers)
    )
}

pub fn name_prompt(clan: Option<&Clan>) -> String {
    match clan {
        Some(c) => format!(
            "{} {} it is. Now, what is your ninja name? (2-20 characters)",
            rarity_badge(c.rarity),
            c.name
        ),
        None => "What is your ninja name? (2-20 characters)".to_string(),
    }
}

/// One-step creation could not turn the display name into a ninja name.
pub fn display_name_unusable(display_name: &str, village: Village) -> String {
    format!(
        "{} {} it is, but '{}' can't be used as a ninja name.\n{}",
        village.emoji(),
        village.name(),
        display_name,
        name_prompt(None)
    )
}

pub fn flow_timed_out(prefix: &str) -> String {
    format!(
        "⌛ Character creation timed out. Type {}start to begin again.",
        prefix
    )
}

pub fn created(player: &Player) -> String {
    let clan = match &player.clan {
        Some(a) => format!(
            "{} {} ({})",
            rarity_badge(a.clan.rarity),
            a.clan.name,
            a.clan.rarity
        ),
        None => "none".to_string(),
    };
    format!(
        "🥷 Welcome, {} of {} {}!\nClan: {}\nRyo: {} | Free rerolls: {}",
        player.display_name,
        player.village.emoji(),
        player.village.name(),
        clan,
        player.ryo,
        player.free_rerolls
    )
}

pub fn profile(player: &Player) -> String {
    let mut out = format!(
        "🥷 {} - {} (Lv {})\n{} {}",
        player.display_name,
        player.rank_title(),
        player.level,
        player.village.emoji(),
        player.village.name()
    );
    if let Some(a) = &player.clan {
        out.push_str(&format!(
            " | {} {} ({})",
            rarity_badge(a.clan.rarity),
            a.clan.name,
            a.clan.rarity
        ));
    }
    out.push_str(&format!(
        "\n❤️ {}/{}  🔵 {}/{}  💰 {} ryo\nXP {}/{}\n",
        player.health,
        player.max_health,
        player.chakra,
        player.max_chakra,
        player.ryo,
        player.experience,
        player.xp_to_next_level()
    ));
    let stats: Vec<String> = player
        .stats
        .iter()
        .map(|(name, value)| format!("{} {}", name, value))
        .collect();
    out.push_str(&stats.join(", "));
    out.push_str(&format!("\nFree rerolls: {}", player.free_rerolls));
    if let Some(active) = &player.active_mission {
        out.push_str(&format!(
            "\nMission: {} ({})",
            active.mission.name, active.mission.rank
        ));
    }
    out
}

pub fn clan_list(catalog: &Catalog) -> String {
    let mut out = String::from("🏮 Clans:");
    for rarity in [Rarity::Legendary, Rarity::Rare, Rarity::Common] {
        let names: Vec<&str> = catalog.clans_of(rarity).map(|c| c.name.as_str()).collect();
        if names.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "\n{} {}: {}",
            rarity_badge(rarity),
            rarity,
            names.join(", ")
        ));
    }
    out
}

pub fn mission_list(missions: &[Mission]) -> String {
    let mut out = String::from("🗺️ Missions:");
    for m in missions {
        out.push_str(&format!(
            "\n[{}] {} (Lv {}+) - {} XP, {} ryo",
            m.rank, m.name, m.required_level, m.reward_xp, m.reward_ryo
        ));
    }
    out
}

pub fn shop_list(catalog: &Catalog) -> String {
    let mut out = String::from("🛒 Shop:");
    for item in &catalog.shop {
        out.push_str(&format!(
            "\n{} - {} ryo ({})",
            item.name,
            item.price,
            item.effect.describe()
        ));
    }
    out
}

pub fn jutsu_list(jutsu: &[String]) -> String {
    if jutsu.is_empty() {
        return "📖 You don't know any jutsu yet.".to_string();
    }
    format!("📖 Your jutsu:\n{}", jutsu.join("\n"))
}

pub fn reroll(outcome: &RerollOutcome) -> String {
    let paid = match outcome.payment {
        RerollPayment::Free { remaining } => format!("free reroll, {} left", remaining),
        RerollPayment::Paid { cost } => format!("paid {} ryo", cost),
    };
    let from = outcome
        .previous
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("no clan");
    format!(
        "🎲 {} → {} {} ({}) [{}]",
        from,
        rarity_badge(outcome.new_clan.rarity),
        outcome.new_clan.name,
        outcome.new_clan.rarity,
        paid
    )
}

pub fn mission_accepted(mission: &Mission, prefix: &str) -> String {
    format!(
        "📜 Accepted {} mission: {}\n{}\nType {}complete when ready.",
        mission.rank, mission.name, mission.description, prefix
    )
}

pub fn mission_outcome(outcome: &MissionOutcome) -> String {
    match outcome {
        MissionOutcome::Success {
            mission,
            xp,
            ryo,
            level_up,
        } => format!(
            "✅ Mission {} complete! +{} XP, +{} ryo{}",
            mission.name,
            xp,
            ryo,
            level_up_line(*level_up)
        ),
        MissionOutcome::Failure { mission } => {
            format!("💥 Mission {} failed. No reward this time.", mission.name)
        }
    }
}

pub fn mission_abandoned(mission: &Mission) -> String {
    format!("🏳️ Abandoned mission {}.", mission.name)
}

pub fn daily(reward: &DailyReward) -> String {
    format!(
        "🎁 Daily reward: +{} ryo, +{} XP{}",
        reward.ryo,
        reward.xp,
        level_up_line(reward.level_up)
    )
}

/// `"5h 03m"` style countdown.
pub fn wait_time(now: DateTime<Utc>, until: DateTime<Utc>) -> String {
    let mins = (until - now).num_minutes().max(0);
    format!("{}h {:02}m", mins / 60, mins % 60)
}

pub fn purchase(outcome: &PurchaseOutcome) -> String {
    let effect = match &outcome.effect {
        PurchaseEffect::Healed { health, max_health } => {
            format!("❤️ Health {}/{}", health, max_health)
        }
        PurchaseEffect::ChakraRestored { chakra, max_chakra } => {
            format!("🔵 Chakra {}/{}", chakra, max_chakra)
        }
        PurchaseEffect::Experience { amount, level_up } => {
            format!("+{} XP{}", amount, level_up_line(*level_up))
        }
        PurchaseEffect::LearnedJutsu(name) => format!("📖 Learned {}!", name),
        PurchaseEffect::AlreadyKnewJutsu(name) => {
            format!("📖 The scroll taught {}, which you already know.", name)
        }
    };
    format!(
        "🛒 Bought {} for {} ryo ({} left). {}",
        outcome.item.name, outcome.item.price, outcome.ryo_left, effect
    )
}

pub fn heal(outcome: &HealOutcome) -> String {
    format!(
        "💚 Healed {} HP. ❤️ {}/{}  🔵 {} chakra left",
        outcome.healed, outcome.health, outcome.max_health, outcome.chakra_left
    )
}

pub fn xp_granted(player: &Player, amount: u64, level_up: Option<LevelUp>) -> String {
    format!(
        "⬆️ Granted {} XP to {} (Lv {}, XP {}/{}){}",
        amount,
        player.display_name,
        player.level,
        player.experience,
        player.xp_to_next_level(),
        level_up_line(level_up)
    )
}

/// User-facing text for a soft game error.
pub fn error(err: &GameError, prefix: &str, now: DateTime<Utc>) -> String {
    match err {
        GameError::NotFound(_) => format!(
            "❌ No character found. Type {}start or {}create <village> to begin.",
            prefix, prefix
        ),
        GameError::AlreadyExists => "❌ You already have a character.".to_string(),
        GameError::TooEarly { next_eligible } => format!(
            "⏳ Daily reward already claimed. Come back in {}.",
            wait_time(now, *next_eligible)
        ),
        other => format!("❌ {}", capitalize(&other.to_string())),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
