//! Binary entrypoint for the shinobibot CLI.
//!
//! Commands:
//! - `start` - run the bot on the console transport (`<user>: <text>` per line)
//! - `init` - write a starter `config.toml` and prepare the data directory
//! - `status` - print storage and catalog summary
//! - `catalog [--json]` - print the active catalog, or dump it as JSON for editing
//!
//! See the library crate docs for module-level details: `shinobibot::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use shinobibot::bot::{console, render, BotServer};
use shinobibot::config::Config;

#[derive(Parser)]
#[command(name = "shinobibot")]
#[command(about = "A ninja RPG chat bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on stdin/stdout
    Start {
        /// Override the configured data directory
        #[arg(short, long)]
        data_dir: Option<String>,
    },
    /// Write a default configuration file
    Init,
    /// Show store and catalog status
    Status,
    /// Print the active catalog
    Catalog {
        /// Dump as JSON (usable as a `storage.catalog_file` override)
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Some(Config::load(&cli.config).await?),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start { data_dir } => {
            let Some(mut config) = pre_config else {
                return Ok(());
            };
            if let Some(dir) = data_dir {
                config.storage.data_dir = dir;
            }
            info!("Starting shinobibot v{}", env!("CARGO_PKG_VERSION"));
            let mut server = BotServer::new(&config)?;
            let (inbound, outbound, writer) = console::spawn_stdio();
            server.run(inbound, outbound).await?;
            // run() owned the sender; the writer finishes once it drains
            let _ = writer.await;
        }
        Commands::Init => {
            info!("Initializing new configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
            let cfg = Config::default();
            tokio::fs::create_dir_all(&cfg.storage.data_dir).await?;
            info!("Data directory ready at {}", cfg.storage.data_dir);
        }
        Commands::Status => {
            let Some(config) = pre_config else {
                return Ok(());
            };
            let server = BotServer::new(&config)?;
            let service = server.service();
            let players = service.store().list_player_ids()?;
            let catalog = service.catalog();
            println!("{}", config.bot.name);
            println!("  prefix:   {}", server.prefix());
            println!("  admins:   {}", config.bot.admin_ids.len());
            println!(
                "  storage:  {:?} at {}",
                config.storage.backend, config.storage.data_dir
            );
            println!("  players:  {}", players.len());
            println!(
                "  catalog:  {} clans, {} missions, {} shop items, {} scroll jutsu",
                catalog.clans.len(),
                catalog.missions.len(),
                catalog.shop.len(),
                catalog.jutsu_pool.len()
            );
        }
        Commands::Catalog { json } => {
            let Some(config) = pre_config else {
                return Ok(());
            };
            let server = BotServer::new(&config)?;
            let catalog = server.service().catalog();
            if json {
                println!("{}", serde_json::to_string_pretty(catalog)?);
            } else {
                println!("{}", render::clan_list(catalog));
                println!("{}", render::mission_list(&catalog.missions));
                println!("{}", render::shop_list(catalog));
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let configured = config
        .as_ref()
        .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok());
    let base_level = match verbosity {
        0 => configured.unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config.as_ref().and_then(|c| {
        let path = c.logging.file.as_ref()?;
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let security_path = config.as_ref().and_then(|c| c.logging.security_file.clone());

    match log_file {
        Some(f) => {
            let file = std::sync::Mutex::new(f);
            // Console echo only in the foreground
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if record.target() == "security" {
                    write_security_line(security_path.as_deref(), &line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if record.target() == "security" {
                    write_security_line(security_path.as_deref(), &line);
                }
                writeln!(fmt, "{}", line)
            });
        }
    }
    let _ = builder.try_init();
}

fn write_security_line(path: Option<&str>, line: &str) {
    use std::io::Write;
    let Some(path) = path else {
        return;
    };
    if let Ok(mut sf) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        let _ = writeln!(sf, "{}", line);
    }
}
