mod config;

use anyhow::{Context, Result};
use bounty_engine::{
    DiscordNotifier, Monitor, Notifier, ReqwestFetcher, StateStore, TelegramNotifier,
};
use chrono::Local;
use clap::Parser;
use monitor_logging::{monitor_info, monitor_warn};

use crate::config::{Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse()).context("invalid configuration")?;
    monitor_logging::initialize(config.log_destination.clone(), config.log_level);
    monitor_info!("🚀 Bug Bounty Monitor started at {}", Local::now());
    monitor_info!("{}", "-".repeat(60));

    if !config.has_notification_credentials() {
        print_setup_guidance();
        return Ok(());
    }
    if config.telegram_missing_chat_id {
        monitor_warn!("TELEGRAM_BOT_TOKEN is set without TELEGRAM_CHAT_ID; Telegram is disabled");
    }

    let notifiers = build_notifiers(&config)?;
    let monitor = Monitor::new(
        Box::new(ReqwestFetcher::new(config.fetch.clone())),
        StateStore::new(&config.state_file),
        notifiers,
        config.monitor.clone(),
    );

    let report = monitor.run_once().await.context("monitor run failed")?;
    monitor_info!(
        "Run complete: {} platform(s) checked, {} failed, {} change(s), {} notification(s) sent",
        report.summary.platforms_checked,
        report.summary.platforms_failed,
        report.summary.changes,
        report.delivery.sent
    );
    Ok(())
}

fn build_notifiers(config: &Config) -> Result<Vec<Box<dyn Notifier>>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
    if let Some(webhook) = &config.discord_webhook {
        let discord = DiscordNotifier::new(webhook.clone()).context("building Discord client")?;
        notifiers.push(Box::new(discord));
    }
    if let Some(telegram) = &config.telegram {
        let bot = TelegramNotifier::new(telegram.bot_token.clone(), telegram.chat_id.clone())
            .context("building Telegram client")?;
        notifiers.push(Box::new(bot));
    }
    Ok(notifiers)
}

const SETUP_GUIDANCE: [&str; 6] = [
    "⚠️  Warning: No notification endpoints configured!",
    "Set DISCORD_WEBHOOK or TELEGRAM_BOT_TOKEN environment variables",
    "Example:",
    "  export DISCORD_WEBHOOK='https://discord.com/api/webhooks/...'",
    "  export TELEGRAM_BOT_TOKEN='123456:ABC-DEF...'",
    "  export TELEGRAM_CHAT_ID='123456789'",
];

// Info level keeps these lines on stdout in mixed terminal mode.
fn print_setup_guidance() {
    for line in SETUP_GUIDANCE {
        monitor_info!("{line}");
    }
}
