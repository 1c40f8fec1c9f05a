//! Notification adapters.
//!
//! Each adapter formats one [`ChangeRecord`] into its service's message shape
//! and posts it. [`deliver_all`] drives every adapter over every record.

mod discord;
mod telegram;

use std::time::Duration;

use bounty_core::ChangeRecord;
use monitor_logging::{monitor_info, monitor_warn};
use serde::Serialize;
use thiserror::Error;

pub use discord::{
    build_embed, Clock, DiscordNotifier, Embed, EmbedField, EmbedFooter, WebhookPayload,
};
pub use telegram::{format_message, SendMessage, TelegramNotifier, DEFAULT_TELEGRAM_API};

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    async fn notify(&self, change: &ChangeRecord) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Send every record through every notifier, in order, pausing `pacing`
/// between sends. A failed send is logged and does not stop the rest.
pub async fn deliver_all(
    notifiers: &[Box<dyn Notifier>],
    changes: &[ChangeRecord],
    pacing: Duration,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    let mut first = true;

    for notifier in notifiers {
        for change in changes {
            if !first && !pacing.is_zero() {
                tokio::time::sleep(pacing).await;
            }
            first = false;

            match notifier.notify(change).await {
                Ok(()) => {
                    report.sent += 1;
                    monitor_info!(
                        "✓ {} notification sent for {}",
                        notifier.name(),
                        change.program
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    monitor_warn!(
                        "✗ Error sending {} notification for {}: {}",
                        notifier.name(),
                        change.program,
                        err
                    );
                }
            }
        }
    }

    report
}

pub(crate) fn build_client() -> Result<reqwest::Client, NotifyError> {
    Ok(reqwest::Client::builder()
        .timeout(DEFAULT_SEND_TIMEOUT)
        .build()?)
}

pub(crate) async fn post_json<T: Serialize + Sync>(
    client: &reqwest::Client,
    url: &str,
    payload: &T,
) -> Result<(), NotifyError> {
    let response = client.post(url).json(payload).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NotifyError::Status {
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }
    Ok(())
}

/// Render at most `cap` items with `line`, then a "... and N more" line.
pub(crate) fn capped_lines<'a>(
    items: impl ExactSizeIterator<Item = &'a String>,
    cap: usize,
    line: impl Fn(&str) -> String,
) -> Vec<String> {
    let total = items.len();
    let mut lines: Vec<String> = items.take(cap).map(|item| line(item.as_str())).collect();
    if total > cap {
        lines.push(format!("... and {} more", total - cap));
    }
    lines
}
