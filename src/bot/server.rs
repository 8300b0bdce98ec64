//! Bot server: routes inbound chat messages to game operations and renders replies.
//!
//! [`BotServer::handle_message`] is transport-agnostic and synchronous; the
//! [`BotServer::run`] loop wires it to channels and expires interactive flows on a
//! one-second housekeeping tick.

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use super::commands::{BotCommand, CommandParser};
use super::flow::{CreationFlows, FlowLookup, FlowStep};
use super::render;
use super::{ChatMessage, Reply};
use crate::config::{BotConfig, Config, StorageBackend};
use crate::game::storage::{JsonPlayerStore, PlayerStore, SledPlayerStore};
use crate::game::{Catalog, Clan, GameError, GameService, Village};
use crate::logutil::escape_log;
use crate::validation::{
    ninja_name_from_display, sanitize_chat_text, validate_ninja_name, NAME_MAX_CHARS,
};

/// Longest inbound line we look at, in characters.
const MAX_INBOUND_CHARS: usize = 500;

macro_rules! sec_log {
    ($($arg:tt)*) => { log::warn!(target: "security", $($arg)*); };
}

pub struct BotServer {
    bot: BotConfig,
    parser: CommandParser,
    flows: CreationFlows,
    service: GameService,
}

impl BotServer {
    /// Build the catalog and open the configured store.
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = match &config.storage.catalog_file {
            Some(path) => Catalog::load_from_json(path)
                .map_err(|e| anyhow!("Failed to load catalog {}: {}", path, e))?,
            None => Catalog::builtin(),
        };
        let store = open_store(config)?;
        let service = GameService::new(catalog, config.game.clone(), store);
        Ok(Self::with_service(config.bot.clone(), service))
    }

    pub fn with_service(bot: BotConfig, service: GameService) -> Self {
        let parser = CommandParser::new(bot.prefix());
        let flows = CreationFlows::new(Duration::from_secs(bot.flow_timeout_secs));
        Self {
            bot,
            parser,
            flows,
            service,
        }
    }

    pub fn service(&self) -> &GameService {
        &self.service
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    /// Handle one inbound message. Soft game errors become replies; only
    /// persistence failures are returned as `Err`.
    pub fn handle_message(&mut self, msg: &ChatMessage) -> Result<Vec<Reply>> {
        let text = sanitize_chat_text(&msg.text, MAX_INBOUND_CHARS);
        let reply = |text: String| vec![Reply::new(&msg.user_id, text)];

        let Some(cmd) = self.parser.parse(&text) else {
            return Ok(match self.flows.lookup(&msg.user_id) {
                FlowLookup::None => Vec::new(),
                FlowLookup::Expired => reply(render::flow_timed_out(self.prefix())),
                FlowLookup::Active(step) => reply(self.answer_flow(msg, step, &text)?),
            });
        };

        debug!(
            "command from {}: {}",
            escape_log(&msg.user_id),
            escape_log(&text)
        );
        let now = Utc::now();
        match self.dispatch(msg, cmd) {
            Ok(text) => Ok(reply(text)),
            Err(e) if e.is_soft() => Ok(reply(render::error(&e, self.prefix(), now))),
            Err(e) => Err(anyhow!("storage failure handling '{}': {}", escape_log(&text), e)),
        }
    }

    fn dispatch(&mut self, msg: &ChatMessage, cmd: BotCommand) -> Result<String, GameError> {
        let user = msg.user_id.as_str();
        let prefix = self.parser.prefix().to_string();
        let text = match cmd {
            BotCommand::Help => render::help(&prefix),
            BotCommand::Start => {
                if self.service.has_character(user)? {
                    return Err(GameError::AlreadyExists);
                }
                self.flows.begin(user);
                render::village_prompt(&prefix)
            }
            BotCommand::Cancel => {
                if self.flows.cancel(user) {
                    "Character creation cancelled.".to_string()
                } else {
                    "Nothing to cancel.".to_string()
                }
            }
            BotCommand::Create(choice) => {
                let village = choice
                    .as_deref()
                    .and_then(Village::parse_choice)
                    .ok_or_else(|| GameError::InvalidChoice(village_hint(&prefix)))?;
                match ninja_name_from_display(&msg.display_name) {
                    Some(name) => {
                        let player = self.service.create_character(user, &name, village)?;
                        self.flows.cancel(user);
                        render::created(&player)
                    }
                    None => {
                        if self.service.has_character(user)? {
                            return Err(GameError::AlreadyExists);
                        }
                        self.flows
                            .set_step(user, FlowStep::ChooseName { village, clan: None });
                        let shown = sanitize_chat_text(&msg.display_name, NAME_MAX_CHARS * 2);
                        render::display_name_unusable(&shown, village)
                    }
                }
            }
            BotCommand::Profile(target) => {
                let id = target.as_deref().unwrap_or(user);
                match self.service.profile(id) {
                    Ok(p) => render::profile(&p),
                    Err(GameError::NotFound(_)) if id != user => {
                        format!("❌ {} has no character.", id)
                    }
                    Err(e) => return Err(e),
                }
            }
            BotCommand::Clans => render::clan_list(self.service.catalog()),
            BotCommand::Reroll => render::reroll(&self.service.reroll_clan(user)?),
            BotCommand::Missions => render::mission_list(&self.service.catalog().missions),
            BotCommand::Accept(name) => {
                render::mission_accepted(&self.service.accept_mission(user, &name)?, &prefix)
            }
            BotCommand::Complete => render::mission_outcome(&self.service.complete_mission(user)?),
            BotCommand::Abandon => render::mission_abandoned(&self.service.abandon_mission(user)?),
            BotCommand::Daily => render::daily(&self.service.claim_daily(user, Utc::now())?),
            BotCommand::Shop => render::shop_list(self.service.catalog()),
            BotCommand::Buy(item) => render::purchase(&self.service.buy(user, &item)?),
            BotCommand::Heal => render::heal(&self.service.heal(user)?),
            BotCommand::Jutsu => render::jutsu_list(&self.service.techniques(user)?),
            BotCommand::GrantXp { amount, target } => {
                if !self.bot.is_admin(user) {
                    sec_log!("xp grant refused for non-admin {}", escape_log(user));
                    return Err(GameError::PermissionDenied("admin only".into()));
                }
                let amount: u64 = amount.parse().map_err(|_| {
                    GameError::InvalidChoice(format!(
                        "'{}' is not a non-negative whole number",
                        amount
                    ))
                })?;
                let target = target.as_deref().unwrap_or(user);
                let (player, level_up) = self.service.grant_experience(target, amount)?;
                info!(
                    target: "security",
                    "xp grant by {}: {} XP to {}",
                    escape_log(user),
                    amount,
                    escape_log(target)
                );
                render::xp_granted(&player, amount, level_up)
            }
            BotCommand::Unknown(word) => format!(
                "❓ Unknown command '{}'. Type {}help for the list.",
                word, prefix
            ),
            BotCommand::Invalid(why) => format!("❌ {}", why),
        };
        Ok(text)
    }

    /// Plain text sent while a creation flow is waiting on `step`.
    fn answer_flow(&mut self, msg: &ChatMessage, step: FlowStep, text: &str) -> Result<String> {
        let user = msg.user_id.as_str();
        let prefix = self.parser.prefix().to_string();
        let answer = text.trim();
        match step {
            FlowStep::ChooseVillage => match Village::parse_choice(answer) {
                Some(village) => {
                    let offers = self.service.offer_clans();
                    if offers.is_empty() {
                        self.flows
                            .set_step(user, FlowStep::ChooseName { village, clan: None });
                        return Ok(render::name_prompt(None));
                    }
                    let prompt = render::clan_prompt(village, &offers);
                    self.flows
                        .set_step(user, FlowStep::ChooseClan { village, offers });
                    Ok(prompt)
                }
                None => {
                    self.flows.touch(user);
                    Ok(format!(
                        "❌ '{}' is not a village.\n{}",
                        answer,
                        render::village_prompt(&prefix)
                    ))
                }
            },
            FlowStep::ChooseClan { village, offers } => match pick_offer(&offers, answer) {
                Some(clan) => {
                    let prompt = render::name_prompt(Some(&clan));
                    self.flows.set_step(
                        user,
                        FlowStep::ChooseName {
                            village,
                            clan: Some(clan),
                        },
                    );
                    Ok(prompt)
                }
                None => {
                    self.flows.touch(user);
                    Ok(render::clan_reprompt(answer, &offers))
                }
            },
            FlowStep::ChooseName { village, clan } => {
                if let Err(e) = validate_ninja_name(answer) {
                    self.flows.touch(user);
                    return Ok(format!("❌ {}. Try another name.", e));
                }
                self.flows.cancel(user);
                match self
                    .service
                    .create_character_with_clan(user, answer, village, clan.as_ref())
                {
                    Ok(player) => Ok(render::created(&player)),
                    Err(e) if e.is_soft() => Ok(render::error(&e, &prefix, Utc::now())),
                    Err(e) => Err(anyhow!("storage failure creating character: {}", e)),
                }
            }
        }
    }

    /// Expire interactive flows and build the timeout notices.
    pub fn housekeeping(&mut self) -> Vec<Reply> {
        let prefix = self.parser.prefix().to_string();
        self.flows
            .prune_expired()
            .into_iter()
            .map(|user| {
                debug!("creation flow for {} timed out", escape_log(&user));
                Reply::new(&user, render::flow_timed_out(&prefix))
            })
            .collect()
    }

    /// Serve until the inbound channel closes or ctrl-c is received.
    pub async fn run(
        &mut self,
        mut inbound: mpsc::Receiver<ChatMessage>,
        outbound: mpsc::Sender<Reply>,
    ) -> Result<()> {
        info!("{} ready (prefix '{}')", self.bot.name, self.prefix());
        let mut periodic = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                _ = periodic.tick() => {
                    for reply in self.housekeeping() {
                        if outbound.send(reply).await.is_err() {
                            warn!("reply channel closed");
                            return Ok(());
                        }
                    }
                }

                msg = inbound.recv() => {
                    let Some(msg) = msg else {
                        info!("Inbound channel closed, shutting down");
                        break;
                    };
                    let replies = match self.handle_message(&msg) {
                        Ok(replies) => replies,
                        Err(e) => {
                            error!("{}", e);
                            let text = "⚠️ Something went wrong, please try again later.";
                            vec![Reply::new(&msg.user_id, text.to_string())]
                        }
                    };
                    for reply in replies {
                        if outbound.send(reply).await.is_err() {
                            warn!("reply channel closed");
                            return Ok(());
                        }
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }
        Ok(())
    }
}

/// Resolve a clan answer by 1-based number or by name (case-insensitive).
fn pick_offer(offers: &[Clan], answer: &str) -> Option<Clan> {
    let by_number = answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| offers.get(i));
    by_number
        .or_else(|| offers.iter().find(|c| c.name.eq_ignore_ascii_case(answer)))
        .cloned()
}

fn village_hint(prefix: &str) -> String {
    let names: Vec<String> = Village::ALL
        .iter()
        .map(|v| format!("{} {}", v.emoji(), v.name()))
        .collect();
    format!(
        "choose a village with {}create <village>: {}",
        prefix,
        names.join(", ")
    )
}

fn open_store(config: &Config) -> Result<Box<dyn PlayerStore>> {
    let store: Box<dyn PlayerStore> = match config.storage.backend {
        StorageBackend::Sled => {
            let path = config.storage.sled_path();
            Box::new(
                SledPlayerStore::open(&path)
                    .map_err(|e| anyhow!("Failed to open sled store {:?}: {}", path, e))?,
            )
        }
        StorageBackend::Json => Box::new(
            JsonPlayerStore::open(&config.storage.data_dir)
                .map_err(|e| anyhow!("Failed to open JSON store {}: {}", config.storage.data_dir, e))?,
        ),
    };
    Ok(store)
}
