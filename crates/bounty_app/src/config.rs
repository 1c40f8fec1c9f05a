//! Command-line and environment configuration.
//!
//! Credentials and paths can come from flags or from the environment.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use bounty_core::DiffOptions;
use bounty_engine::{
    FetchSettings, MonitorSettings, DEFAULT_DATA_URL, DEFAULT_PLATFORMS, DEFAULT_STATE_FILENAME,
};
use clap::builder::BoolishValueParser;
use clap::Parser;
use monitor_logging::{LevelFilter, LogDestination};
use thiserror::Error;
use url::Url;

#[derive(Debug, Parser)]
#[command(
    name = "bounty_monitor",
    version,
    about = "Watch bug bounty program listings and report scope changes"
)]
pub struct Cli {
    /// Discord-compatible webhook URL.
    #[arg(long, env = "DISCORD_WEBHOOK", hide_env_values = true)]
    pub discord_webhook: Option<String>,

    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat to post into.
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Base URL of the `<platform>_data.json` listings.
    #[arg(long, env = "BOUNTY_DATA_URL", default_value = DEFAULT_DATA_URL)]
    pub data_url: String,

    #[arg(long, env = "BOUNTY_STATE_FILE", default_value = DEFAULT_STATE_FILENAME)]
    pub state_file: PathBuf,

    /// Platforms to check, in order.
    #[arg(
        long,
        env = "BOUNTY_PLATFORMS",
        value_delimiter = ',',
        default_values_t = DEFAULT_PLATFORMS.map(String::from)
    )]
    pub platforms: Vec<String>,

    /// Also notify when a program disappears from a platform listing.
    #[arg(long, env = "NOTIFY_DELISTED", value_parser = BoolishValueParser::new())]
    pub notify_delisted: bool,

    /// Pause between platform fetches, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub fetch_delay_ms: u64,

    /// Pause between notification sends, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub send_delay_ms: u64,

    /// Also write logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("no platforms configured")]
    NoPlatforms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_webhook: Option<String>,
    pub telegram: Option<TelegramConfig>,
    /// Token given without a chat id; the Telegram adapter stays off.
    pub telegram_missing_chat_id: bool,
    pub fetch: FetchSettings,
    pub monitor: MonitorSettings,
    pub state_file: PathBuf,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let discord_webhook = non_empty(cli.discord_webhook);
        if let Some(webhook) = &discord_webhook {
            validate_url("DISCORD_WEBHOOK", webhook)?;
        }
        validate_url("BOUNTY_DATA_URL", &cli.data_url)?;

        let bot_token = non_empty(cli.telegram_bot_token);
        let chat_id = non_empty(cli.telegram_chat_id);
        let telegram_missing_chat_id = bot_token.is_some() && chat_id.is_none();
        let telegram = bot_token
            .zip(chat_id)
            .map(|(bot_token, chat_id)| TelegramConfig { bot_token, chat_id });

        let mut seen = HashSet::new();
        let platforms: Vec<String> = cli
            .platforms
            .into_iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty() && seen.insert(p.clone()))
            .collect();
        if platforms.is_empty() {
            return Err(ConfigError::NoPlatforms);
        }

        let log_destination = match cli.log_file {
            Some(path) => LogDestination::Both(path),
            None => LogDestination::Terminal,
        };

        Ok(Self {
            discord_webhook,
            telegram,
            telegram_missing_chat_id,
            fetch: FetchSettings {
                data_url: cli.data_url,
                ..FetchSettings::default()
            },
            monitor: MonitorSettings {
                platforms,
                fetch_pacing: Duration::from_millis(cli.fetch_delay_ms),
                send_pacing: Duration::from_millis(cli.send_delay_ms),
                diff: DiffOptions {
                    report_delisted: cli.notify_delisted,
                },
            },
            state_file: cli.state_file,
            log_destination,
            log_level: if cli.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        })
    }

    /// A webhook URL or a bot token was supplied.
    pub fn has_notification_credentials(&self) -> bool {
        self.discord_webhook.is_some() || self.telegram.is_some() || self.telegram_missing_chat_id
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Serializes tests that read or write NOTIFY_DELISTED.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bounty_monitor").chain(args.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn defaults_cover_all_platforms() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = Config::from_cli(parse(&["--discord-webhook", "https://example.com/hook"]))
            .unwrap();

        assert_eq!(config.monitor.platforms, DEFAULT_PLATFORMS.map(String::from));
        assert_eq!(config.fetch.data_url, DEFAULT_DATA_URL);
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILENAME));
        assert_eq!(config.monitor.fetch_pacing, Duration::from_secs(2));
        assert_eq!(config.monitor.send_pacing, Duration::from_secs(1));
        assert!(!config.monitor.diff.report_delisted);
        assert!(config.has_notification_credentials());
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let config = Config::from_cli(parse(&[
            "--discord-webhook",
            "  ",
            "--telegram-chat-id",
            "42",
        ]))
        .unwrap();

        assert_eq!(config.discord_webhook, None);
        assert_eq!(config.telegram, None);
        assert!(!config.has_notification_credentials());
    }

    #[test]
    fn token_without_chat_id_disables_telegram_but_counts_as_configured() {
        let config = Config::from_cli(parse(&["--telegram-bot-token", "123:abc"])).unwrap();

        assert_eq!(config.telegram, None);
        assert!(config.telegram_missing_chat_id);
        assert!(config.has_notification_credentials());
    }

    #[test]
    fn telegram_needs_token_and_chat_id() {
        let config = Config::from_cli(parse(&[
            "--telegram-bot-token",
            "123:abc",
            "--telegram-chat-id",
            "42",
        ]))
        .unwrap();

        assert_eq!(
            config.telegram,
            Some(TelegramConfig {
                bot_token: "123:abc".to_string(),
                chat_id: "42".to_string(),
            })
        );
    }

    #[test]
    fn platform_list_is_split_and_normalized() {
        let config = Config::from_cli(parse(&[
            "--discord-webhook",
            "https://example.com/hook",
            "--platforms",
            "HackerOne, bugcrowd,,",
        ]))
        .unwrap();

        assert_eq!(config.monitor.platforms, vec!["hackerone", "bugcrowd"]);
    }

    #[test]
    fn repeated_platforms_are_visited_once() {
        let config = Config::from_cli(parse(&[
            "--discord-webhook",
            "https://example.com/hook",
            "--platforms",
            "hackerone,bugcrowd,HackerOne, bugcrowd ",
        ]))
        .unwrap();

        assert_eq!(config.monitor.platforms, vec!["hackerone", "bugcrowd"]);
    }

    #[test]
    fn notify_delisted_env_accepts_common_boolean_spellings() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let cases = [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("true", true),
            ("0", false),
            ("no", false),
            ("false", false),
        ];
        for (value, expected) in cases {
            std::env::set_var("NOTIFY_DELISTED", value);
            let parsed = Cli::try_parse_from(["bounty_monitor"]);
            std::env::remove_var("NOTIFY_DELISTED");

            let cli = parsed.unwrap_or_else(|err| panic!("NOTIFY_DELISTED={value}: {err}"));
            assert_eq!(cli.notify_delisted, expected, "NOTIFY_DELISTED={value}");
        }
    }

    #[test]
    fn rejects_non_http_webhook() {
        let err = Config::from_cli(parse(&["--discord-webhook", "ftp://example.com"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidUrl {
                name: "DISCORD_WEBHOOK",
                value: "ftp://example.com".to_string(),
            }
        );
    }
}
