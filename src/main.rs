use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use log::{debug, warn};
use std::fmt;
use std::io::{self, BufRead};
use std::path::PathBuf;

use vendorbazaar::config::Config;
use vendorbazaar::store;
use vendorbazaar::time::{Clock, FixedClock, RawTimestamp, RelativeFormatter, SystemClock};
use vendorbazaar::ui::chat_row;

#[derive(Parser, Debug)]
#[command(name = "vendorbazaar")]
#[command(version)]
#[command(about = "Normalize marketplace timestamps and render list labels", long_about = None)]
struct Args {
    /// Treat this RFC 3339 instant as the current time
    #[arg(long, global = true)]
    now: Option<String>,

    /// Locale tag (en-US, de_DE.UTF-8, ...); overrides config and environment
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Display zone as +HH:MM or -HH:MM; defaults to the local zone
    #[arg(long, global = true, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Label JSON timestamp values, one per argument or per stdin line
    Label {
        /// JSON values such as '{"seconds":1718447400}'
        values: Vec<String>,
    },

    /// List chat previews from a JSON file, newest first
    Inbox {
        /// JSON array of chat documents
        file: PathBuf,
    },

    /// Show the config path and effective settings
    Config {
        /// Write the effective settings back to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::load().context("Failed to load config")?;
    if args.locale.is_some() {
        config.locale = args.locale.clone();
    }
    if args.utc_offset.is_some() {
        config.utc_offset = args.utc_offset.clone();
    }

    if let Commands::Config { save } = args.command {
        return show_config(&config, save);
    }

    let fixed;
    let clock: &dyn Clock = match &args.now {
        Some(now) => {
            let now = DateTime::parse_from_rfc3339(now)
                .with_context(|| format!("Invalid --now value: {}", now))?;
            fixed = FixedClock(now.with_timezone(&Utc));
            &fixed
        }
        None => &SystemClock,
    };

    let locale = config.display_locale()?;
    debug!("Using locale {} ({:?})", locale.tag, locale.hour_cycle);

    match config.display_offset()? {
        Some(offset) => run(args.command, &RelativeFormatter::new(clock, offset, locale)),
        None => run(args.command, &RelativeFormatter::new(clock, Local, locale)),
    }
}

fn run<C, Tz>(command: Commands, formatter: &RelativeFormatter<C, Tz>) -> Result<()>
where
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match command {
        Commands::Label { values } if values.is_empty() => {
            for line in io::stdin().lock().lines() {
                let line = line.context("Failed to read stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                println!("{}", label_line(formatter, &line));
            }
        }
        Commands::Label { values } => {
            for value in &values {
                println!("{}", label_line(formatter, value));
            }
        }
        Commands::Inbox { file } => {
            let mut chats = store::load_chats(&file)
                .with_context(|| format!("Failed to load chats from {:?}", file))?;
            store::sort_newest_first(&mut chats);
            for chat in &chats {
                println!("{}", chat_row(chat, formatter));
            }
        }
        Commands::Config { .. } => {}
    }
    Ok(())
}

/// Input that is not JSON gets a blank label, like any other unreadable value.
fn label_line<C, Tz>(formatter: &RelativeFormatter<C, Tz>, input: &str) -> String
where
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let raw = match serde_json::from_str::<serde_json::Value>(input) {
        Ok(value) => store::raw_from_value(&value),
        Err(e) => {
            warn!("Not a JSON value: {} ({})", input, e);
            RawTimestamp::Unrecognized
        }
    };
    formatter.display_label(&raw)
}

fn show_config(config: &Config, save: bool) -> Result<()> {
    let path = Config::config_path()?;
    let locale = config.display_locale()?;
    let zone = match config.display_offset()? {
        Some(offset) => offset.to_string(),
        None => "local".to_string(),
    };

    println!("Config file: {}", path.display());
    println!("Locale:      {}", locale.tag);
    println!("Hour cycle:  {:?}", locale.hour_cycle);
    println!("Date style:  {:?}", locale.date);
    println!("Zone:        {}", zone);

    if save {
        config.save().context("Failed to save config")?;
        println!("Saved.");
    }
    Ok(())
}
