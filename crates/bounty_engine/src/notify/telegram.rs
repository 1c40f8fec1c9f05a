use bounty_core::{ChangeKind, ChangeRecord, TargetSet};
use serde::Serialize;

use super::{build_client, capped_lines, post_json, Notifier, NotifyError};

pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

const NEW_PROGRAM_CAP: usize = 15;
const UPDATE_CAP: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
}

/// Render one change as Telegram HTML.
pub fn format_message(change: &ChangeRecord) -> String {
    let program = escape_html(&change.program);
    let platform = escape_html(&change.platform.to_uppercase());

    let mut message = match change.kind {
        ChangeKind::NewProgram => format!("🆕 <b>New Program: {program}</b>\n"),
        ChangeKind::Updated => format!("🔄 <b>Program Updated: {program}</b>\n"),
        ChangeKind::Delisted => format!("🗑️ <b>Program Delisted: {program}</b>\n"),
    };
    message.push_str(&format!("Platform: <b>{platform}</b>\n\n"));

    if change.is_new_program() {
        push_section(&mut message, "📥", "Targets", &change.added, NEW_PROGRAM_CAP);
    } else {
        if !change.added.is_empty() {
            push_section(&mut message, "➕", "Added", &change.added, UPDATE_CAP);
            message.push('\n');
        }
        push_section(&mut message, "➖", "Removed", &change.removed, UPDATE_CAP);
    }

    if !change.url.is_empty() {
        message.push_str(&format!(
            "\n🔗 <a href=\"{}\">View Program</a>",
            escape_html(&change.url)
        ));
    }
    message
}

fn push_section(message: &mut String, icon: &str, label: &str, targets: &TargetSet, cap: usize) {
    if targets.is_empty() {
        return;
    }
    message.push_str(&format!("{icon} <b>{label} ({}):</b>\n", targets.len()));
    for line in capped_lines(targets.iter(), cap, |t| {
        format!("• <code>{}</code>", escape_html(t))
    }) {
        message.push_str(&line);
        message.push('\n');
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Sends one chat message per change through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            client: build_client()?,
            api_base: DEFAULT_TELEGRAM_API.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "Telegram"
    }

    async fn notify(&self, change: &ChangeRecord) -> Result<(), NotifyError> {
        let payload = SendMessage {
            chat_id: self.chat_id.clone(),
            text: format_message(change),
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        post_json(&self.client, &self.send_message_url(), &payload).await
    }
}
