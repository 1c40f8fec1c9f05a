use std::sync::Arc;
use std::time::Duration;

use bounty_core::{ChangeKind, ChangeRecord};
use bounty_engine::{deliver_all, DiscordNotifier, Notifier, NotifyError, TelegramNotifier};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn change(program: &str, kind: ChangeKind, added: &[&str], removed: &[&str]) -> ChangeRecord {
    ChangeRecord {
        platform: "hackerone".to_string(),
        program: program.to_string(),
        url: format!("https://hackerone.com/{program}"),
        kind,
        added: added.iter().map(|t| t.to_string()).collect(),
        removed: removed.iter().map(|t| t.to_string()).collect(),
    }
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).expect("json body"))
        .collect()
}

#[tokio::test]
async fn discord_posts_one_embed_per_change() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let notifier = DiscordNotifier::new(format!("{}/webhook", server.uri()))
        .unwrap()
        .with_clock(Arc::new(|| "2024-05-01T12:00:00Z".to_string()));
    let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(notifier)];
    let changes = vec![
        change("acme", ChangeKind::NewProgram, &["a.com"], &[]),
        change("widgets", ChangeKind::Updated, &["new.com"], &["old.com"]),
    ];

    let report = deliver_all(&notifiers, &changes, Duration::ZERO).await;
    assert_eq!(report.sent, 2);
    assert_eq!(report.failed, 0);

    let bodies = received_bodies(&server).await;
    assert_eq!(
        bodies[0],
        json!({
            "embeds": [{
                "title": "🆕 New Program: acme",
                "description": "Platform: **HACKERONE**",
                "color": 3066993,
                "url": "https://hackerone.com/acme",
                "fields": [{"name": "📥 Targets (1)", "value": "• `a.com`", "inline": false}],
                "timestamp": "2024-05-01T12:00:00Z",
                "footer": {"text": "Bug Bounty Monitor"}
            }]
        })
    );
    let fields = &bodies[1]["embeds"][0]["fields"];
    assert_eq!(fields[0]["name"], "➕ Added (1)");
    assert_eq!(fields[1]["name"], "➖ Removed (1)");
}

#[tokio::test]
async fn telegram_posts_html_message_to_bot_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_partial_json(json!({
            "chat_id": "4242",
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new("123:abc", "4242")
        .unwrap()
        .with_api_base(server.uri());

    notifier
        .notify(&change("acme", ChangeKind::NewProgram, &["a.com"], &[]))
        .await
        .expect("delivered");

    let bodies = received_bodies(&server).await;
    let text = bodies[0]["text"].as_str().unwrap();
    assert!(text.starts_with("🆕 <b>New Program: acme</b>\n"));
    assert!(text.contains("• <code>a.com</code>\n"));
    assert!(text.ends_with("<a href=\"https://hackerone.com/acme\">View Program</a>"));
}

#[tokio::test]
async fn failed_delivery_does_not_stop_the_rest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_partial_json(json!({"embeds": [{"title": "🆕 New Program: broken"}]})))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad embed"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let notifier = DiscordNotifier::new(format!("{}/webhook", server.uri())).unwrap();
    let notifiers: Vec<Box<dyn Notifier>> = vec![Box::new(notifier)];
    let changes = vec![
        change("broken", ChangeKind::NewProgram, &["a.com"], &[]),
        change("fine", ChangeKind::NewProgram, &["b.com"], &[]),
    ];

    let report = deliver_all(&notifiers, &changes, Duration::ZERO).await;

    assert_eq!(report.sent, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(received_bodies(&server).await.len(), 2);
}

#[tokio::test]
async fn non_success_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let notifier = TelegramNotifier::new("bad", "1")
        .unwrap()
        .with_api_base(server.uri());
    let err = notifier
        .notify(&change("acme", ChangeKind::Updated, &["a.com"], &[]))
        .await
        .unwrap_err();

    match err {
        NotifyError::Status { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("unexpected error {other:?}"),
    }
}
