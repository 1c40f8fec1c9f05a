use std::sync::Arc;

use bounty_core::{ChangeKind, ChangeRecord, TargetSet};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::{build_client, capped_lines, post_json, Notifier, NotifyError};

const LIST_CAP: usize = 10;
// Discord rejects embed titles and field values longer than these.
const TITLE_LIMIT: usize = 256;
const FIELD_VALUE_LIMIT: usize = 1024;
const FOOTER: &str = "Bug Bounty Monitor";

const COLOR_NEW: u32 = 3_066_993;
const COLOR_UPDATED: u32 = 15_844_367;
const COLOR_DELISTED: u32 = 15_158_332;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Build the rich message for one change. `timestamp` is RFC 3339.
pub fn build_embed(change: &ChangeRecord, timestamp: &str) -> Embed {
    let (title, color) = match change.kind {
        ChangeKind::NewProgram => (format!("🆕 New Program: {}", change.program), COLOR_NEW),
        ChangeKind::Updated => (
            format!("🔄 Program Updated: {}", change.program),
            COLOR_UPDATED,
        ),
        ChangeKind::Delisted => (
            format!("🗑️ Program Delisted: {}", change.program),
            COLOR_DELISTED,
        ),
    };

    let mut fields = Vec::new();
    if change.is_new_program() {
        fields.extend(target_field("📥 Targets", &change.added));
    } else {
        fields.extend(target_field("➕ Added", &change.added));
        fields.extend(target_field("➖ Removed", &change.removed));
    }

    Embed {
        title: truncate_chars(title, TITLE_LIMIT),
        description: format!("Platform: **{}**", change.platform.to_uppercase()),
        color,
        url: Some(change.url.clone()).filter(|url| !url.is_empty()),
        fields,
        timestamp: timestamp.to_string(),
        footer: EmbedFooter {
            text: FOOTER.to_string(),
        },
    }
}

fn target_field(label: &str, targets: &TargetSet) -> Option<EmbedField> {
    if targets.is_empty() {
        return None;
    }
    let value = capped_lines(targets.iter(), LIST_CAP, |t| format!("• `{t}`")).join("\n");
    Some(EmbedField {
        name: format!("{label} ({})", targets.len()),
        value: truncate_chars(value, FIELD_VALUE_LIMIT),
        inline: false,
    })
}

fn truncate_chars(value: String, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value;
    }
    let mut truncated: String = value.chars().take(limit - 1).collect();
    truncated.push('…');
    truncated
}

pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Posts one embed per change to a webhook URL.
pub struct DiscordNotifier {
    client: reqwest::Client,
    webhook_url: String,
    clock: Clock,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client()?,
            webhook_url: webhook_url.into(),
            clock: Arc::new(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        })
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &str {
        "Discord"
    }

    async fn notify(&self, change: &ChangeRecord) -> Result<(), NotifyError> {
        let payload = WebhookPayload {
            embeds: vec![build_embed(change, &(self.clock)())],
        };
        post_json(&self.client, &self.webhook_url, &payload).await
    }
}
