//! Prefixed chat command parser.
//!
//! Commands are recognized only when they start with the configured prefix so normal
//! conversation never triggers the bot. Command words are case-insensitive; the
//! remainder of the line is kept verbatim as the argument.

use log::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    /// Open the interactive creation flow.
    Start,
    /// Leave the interactive creation flow.
    Cancel,
    /// One-shot creation; the argument is the village choice if given.
    Create(Option<String>),
    /// Own profile, or the mentioned user's.
    Profile(Option<String>),
    Clans,
    Reroll,
    Missions,
    Accept(String),
    Complete,
    Abandon,
    Daily,
    Shop,
    Buy(String),
    Heal,
    Jutsu,
    /// Admin experience grant: raw amount text and optional target mention.
    GrantXp {
        amount: String,
        target: Option<String>,
    },
    Unknown(String),
    Invalid(String),
}

pub struct CommandParser {
    prefix: String,
}

impl CommandParser {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// True if `raw` is addressed to the bot at all.
    pub fn is_command(&self, raw: &str) -> bool {
        raw.trim_start().starts_with(&self.prefix)
    }

    /// Parse a prefixed line. Returns `None` for text without the prefix.
    pub fn parse(&self, raw: &str) -> Option<BotCommand> {
        let body = raw.trim().strip_prefix(&self.prefix)?;
        let (word, rest) = match body.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (body, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());
        let word = word.to_ascii_lowercase();

        let cmd = match word.as_str() {
            "help" | "commands" | "?" => BotCommand::Help,
            "start" => BotCommand::Start,
            "cancel" => BotCommand::Cancel,
            "create" => BotCommand::Create(arg),
            "profile" | "me" | "stats" => BotCommand::Profile(arg.map(|a| parse_mention(&a))),
            "clans" => BotCommand::Clans,
            "reroll" => BotCommand::Reroll,
            "missions" => BotCommand::Missions,
            "accept" => match arg {
                Some(name) => BotCommand::Accept(name),
                None => BotCommand::Invalid("Mission name required".into()),
            },
            "complete" => BotCommand::Complete,
            "abandon" => BotCommand::Abandon,
            "daily" => BotCommand::Daily,
            "shop" => BotCommand::Shop,
            "buy" => match arg {
                Some(item) => BotCommand::Buy(item),
                None => BotCommand::Invalid("Item name required".into()),
            },
            "heal" => BotCommand::Heal,
            "jutsu" | "techniques" => BotCommand::Jutsu,
            "xp" => parse_grant(rest),
            "" => BotCommand::Unknown(String::new()),
            other => BotCommand::Unknown(other.to_string()),
        };
        trace!("Parsed {:?} from '{}'", cmd, raw);
        Some(cmd)
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PREFIX)
    }
}

fn parse_grant(rest: &str) -> BotCommand {
    let mut parts = rest.split_whitespace();
    let Some(amount) = parts.next() else {
        return BotCommand::Invalid("Amount required".into());
    };
    let target = parts.next().map(parse_mention);
    BotCommand::GrantXp {
        amount: amount.to_string(),
        target,
    }
}

/// Accept `@name`, `<@123>` / `<@!123>` platform mentions, or a bare id.
pub fn parse_mention(raw: &str) -> String {
    let s = raw.trim();
    if let Some(inner) = s.strip_prefix("<@").and_then(|r| r.strip_suffix('>')) {
        return inner.trim_start_matches('!').to_string();
    }
    s.trim_start_matches('@').to_string()
}
