use std::time::Duration;

use bounty_core::{update, DiffOptions, Effect, Msg, PlatformOutcome, RunState, RunSummary};
use monitor_logging::log::{log, Level};
use monitor_logging::{monitor_debug, monitor_info};
use thiserror::Error;

use crate::fetch::Fetcher;
use crate::notify::{deliver_all, DeliveryReport, Notifier};
use crate::state_store::{StateError, StateStore};

pub const DEFAULT_PLATFORMS: [&str; 5] =
    ["hackerone", "bugcrowd", "intigriti", "yeswehack", "hackenproof"];

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// Visited in this order.
    pub platforms: Vec<String>,
    /// Pause between platform fetches.
    pub fetch_pacing: Duration,
    /// Pause between notification sends.
    pub send_pacing: Duration,
    pub diff: DiffOptions,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            platforms: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
            fetch_pacing: Duration::from_secs(2),
            send_pacing: Duration::from_secs(1),
            diff: DiffOptions::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not load previous state: {0}")]
    LoadState(#[source] StateError),
    #[error("could not save state: {0}")]
    SaveState(#[source] StateError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    pub delivery: DeliveryReport,
}

/// Runs one full check: every platform, then notifications, then persistence.
pub struct Monitor {
    fetcher: Box<dyn Fetcher>,
    store: StateStore,
    notifiers: Vec<Box<dyn Notifier>>,
    settings: MonitorSettings,
}

impl Monitor {
    pub fn new(
        fetcher: Box<dyn Fetcher>,
        store: StateStore,
        notifiers: Vec<Box<dyn Notifier>>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            fetcher,
            store,
            notifiers,
            settings,
        }
    }

    pub async fn run_once(&self) -> Result<RunReport, RunError> {
        let previous = self.store.load().map_err(RunError::LoadState)?;
        monitor_info!("Monitoring platforms: {}", self.settings.platforms.join(", "));

        let mut state = RunState::new(previous, self.settings.diff);
        for (index, platform) in self.settings.platforms.iter().enumerate() {
            if index > 0 && !self.settings.fetch_pacing.is_zero() {
                tokio::time::sleep(self.settings.fetch_pacing).await;
            }
            state = self.check_platform(state, platform).await;
        }

        let (state, effects) = update(state, Msg::RunFinished);
        let mut delivery = DeliveryReport::default();
        for effect in effects {
            match effect {
                Effect::DeliverNotifications { changes } => {
                    monitor_info!("📬 Sending notifications for {} change(s)...", changes.len());
                    delivery =
                        deliver_all(&self.notifiers, &changes, self.settings.send_pacing).await;
                    monitor_info!(
                        "Notifications finished: {} sent, {} failed",
                        delivery.sent,
                        delivery.failed
                    );
                }
                Effect::PersistState { state } => {
                    self.store.save(&state).map_err(RunError::SaveState)?;
                    monitor_info!("💾 State saved to {:?}", self.store.path());
                }
            }
        }

        let summary = state.summary();
        if summary.changes == 0 {
            monitor_info!("✓ No changes detected across all platforms");
        }
        Ok(RunReport { summary, delivery })
    }

    async fn check_platform(&self, state: RunState, platform: &str) -> RunState {
        monitor_info!("📡 Checking {platform}...");
        let msg = match self.fetcher.fetch(platform).await {
            Ok(output) => {
                monitor_debug!(
                    "Fetched {} ({} bytes, {} redirect(s), {} program(s))",
                    output.metadata.final_url,
                    output.metadata.byte_len,
                    output.metadata.redirect_count,
                    output.programs.len()
                );
                Msg::PlatformFetched {
                    platform: platform.to_string(),
                    programs: output.programs,
                }
            }
            Err(err) => Msg::PlatformFailed {
                platform: platform.to_string(),
                reason: err.to_string(),
            },
        };

        let (state, _effects) = update(state, msg);
        if let Some(outcome) = state.outcomes().last() {
            for (level, line) in outcome_lines(outcome) {
                log!(level, "{line}");
            }
        }
        state
    }
}

/// Status lines for one platform. Delistings are the only warning.
fn outcome_lines(outcome: &PlatformOutcome) -> Vec<(Level, String)> {
    match outcome {
        PlatformOutcome::Checked {
            changes, delisted, ..
        } => {
            let mut lines = vec![if *changes > 0 {
                (
                    Level::Info,
                    format!("  ✓ Found {changes} program(s) with changes"),
                )
            } else {
                (Level::Info, "  • No changes detected".to_string())
            }];
            if !delisted.is_empty() {
                lines.push((
                    Level::Warn,
                    format!(
                        "  ! {} program(s) no longer listed: {}",
                        delisted.len(),
                        delisted.join(", ")
                    ),
                ));
            }
            lines
        }
        PlatformOutcome::Failed { platform, reason } => vec![(
            Level::Info,
            format!("  ✗ Failed to fetch data for {platform}: {reason}"),
        )],
    }
}
