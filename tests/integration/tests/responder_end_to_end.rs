use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use afk_channel_match::{ConversationSpace, SpaceId};
use afk_responder::{
    build_auto_responder, execute_responder_command, load_responder_config,
    parse_responder_command, AutoResponder, CommandContext, CommandReply, InboundMessage,
    NoticeSender, ResponderDecision, SendError,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

const DEPLOYMENT_CONFIG: &str = r#"{
    "schema_version": 1,
    "timezone": "Asia/Taipei",
    "window": {
        "type": "sleep_window",
        "block_start": "21:00",
        "block_end": "08:00"
    },
    "monitor": {
        "categories": ["Tɪcket", "Upload Channel", "UPLOAD ONLY AVATAR"],
        "channels": [822211672840208395, "general"],
        "monitor_forums": true,
        "forums": ["help"]
    },
    "template": "{current_time} | {status_message} | {next_available}"
}"#;

#[derive(Default)]
struct CountingSender {
    sends: AtomicUsize,
}

#[async_trait]
impl NoticeSender for CountingSender {
    async fn send_notice(&self, _space: &ConversationSpace, _content: &str) -> Result<(), SendError> {
        tokio::task::yield_now().await;
        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn deployment_responder() -> AutoResponder {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("responder.json");
    std::fs::write(&path, DEPLOYMENT_CONFIG).expect("write config");
    let config = load_responder_config(&path).expect("load config");
    build_auto_responder(&config).expect("build responder")
}

fn taipei_night() -> DateTime<Utc> {
    chrono_tz::Asia::Taipei
        .with_ymd_and_hms(2026, 10, 14, 23, 30, 0)
        .single()
        .expect("local time")
        .with_timezone(&Utc)
}

fn visitor_in(space: ConversationSpace) -> InboundMessage {
    InboundMessage {
        space,
        author_name: "visitor".to_string(),
        author_is_bot: false,
    }
}

#[test]
fn integration_plain_channel_name_substring_is_monitored() {
    let responder = deployment_responder();
    let space = ConversationSpace::plain(1_u64, "general-chat");
    assert!(responder.matcher().is_monitored(&space));
}

#[test]
fn integration_forum_thread_matches_on_forum_name_only() {
    let responder = deployment_responder();
    let thread = ConversationSpace::thread(
        3_u64,
        "totally unrelated title",
        ConversationSpace::forum(2_u64, "Help Desk"),
    );
    assert!(responder.matcher().is_monitored(&thread));

    let elsewhere = ConversationSpace::thread(
        5_u64,
        "help me",
        ConversationSpace::forum(4_u64, "Showcase"),
    );
    assert!(!responder.matcher().is_monitored(&elsewhere));
}

#[test]
fn integration_small_caps_category_keyword_matches_exact_text() {
    let responder = deployment_responder();
    let ticket = ConversationSpace::plain(6_u64, "ticket-0042").with_category("Tɪcket");
    assert!(responder.matcher().is_monitored(&ticket));
    let by_id = ConversationSpace::plain(822_211_672_840_208_395_u64, "renamed");
    assert!(responder.matcher().is_monitored(&by_id));
}

#[tokio::test]
async fn integration_first_message_sends_once_per_channel() {
    let responder = deployment_responder();
    let sender = CountingSender::default();
    let message = visitor_in(ConversationSpace::plain(7_u64, "general"));

    assert_eq!(
        responder
            .handle_message(&message, taipei_night(), &sender)
            .await,
        ResponderDecision::Sent
    );
    assert!(responder.is_replied(SpaceId::new(7)));
    assert_eq!(
        responder
            .handle_message(&message, taipei_night(), &sender)
            .await,
        ResponderDecision::AlreadyReplied
    );
    assert_eq!(sender.sends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn integration_admin_clear_reenables_notices() {
    let responder = deployment_responder();
    let sender = CountingSender::default();
    for id in [7_u64, 8, 9] {
        responder.mark_replied(SpaceId::new(id));
    }

    let space = ConversationSpace::plain(7_u64, "general");
    let command = parse_responder_command("!clear", "!").expect("clear command");
    let response = execute_responder_command(
        &responder,
        command,
        &CommandContext {
            space: Some(&space),
            invoker_is_admin: true,
            now: taipei_night(),
            prefix: "!",
        },
    );
    assert_eq!(
        response.replies,
        vec![CommandReply::Text(
            "✅ Cleared reply records for 3 channel(s)".to_string()
        )]
    );
    assert_eq!(responder.replied_count(), 0);

    let decision = responder
        .handle_message(&visitor_in(space), taipei_night(), &sender)
        .await;
    assert!(decision.sent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn integration_concurrent_handlers_send_at_most_once_per_space() {
    let responder = Arc::new(deployment_responder());
    let sender = Arc::new(CountingSender::default());
    let mut handles = Vec::new();
    for _ in 0..16 {
        let responder = Arc::clone(&responder);
        let sender = Arc::clone(&sender);
        handles.push(tokio::spawn(async move {
            let message = visitor_in(ConversationSpace::plain(10_u64, "general"));
            responder
                .handle_message(&message, taipei_night(), sender.as_ref())
                .await
        }));
    }
    let mut sent = 0;
    for handle in handles {
        if handle.await.expect("join handler").sent() {
            sent += 1;
        }
    }
    assert_eq!(sent, 1);
    assert_eq!(sender.sends.load(Ordering::SeqCst), 1);
}
