#![cfg(test)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use mockall::mock;
use purevoice_bot::{
    base::{
        config::{Config, ConfigInner},
        prompts,
        types::{AuthorKind, MentionEvent, PromptMessage, Res, Role, ThreadMessage, UserTurn, Void},
    },
    interaction::mention::handle_mention,
    service::{
        chat::{ChatClient, GenericChatClient},
        llm::{GenericLlmClient, LlmClient},
    },
};

// Mocks.

mock! {
    pub Chat {}

    #[async_trait]
    impl GenericChatClient for Chat {
        async fn start(&self) -> Void;
        async fn post_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Res<String>;
        async fn update_message(&self, channel_id: &str, ts: &str, text: &str) -> Void;
        async fn get_thread_replies(&self, channel_id: &str, thread_ts: &str) -> Res<Vec<ThreadMessage>>;
    }
}

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        async fn generate_reply(&self, turn: &UserTurn, transcript: &[PromptMessage]) -> Res<String>;
    }
}

// Helpers.

/// Records every `update_message` call so tests can wait for the terminal edit.
type Updates = Arc<Mutex<Vec<(String, String)>>>;

fn get_test_config() -> Config {
    Config {
        inner: Arc::new(ConfigInner {
            brand_voice_directive: "Speak in the brand voice.".to_string(),
            ..Default::default()
        }),
    }
}

fn get_mock_chat(placeholder_ts: &str, history: Vec<ThreadMessage>, updates: Updates) -> MockChat {
    let placeholder_ts = placeholder_ts.to_string();
    let mut mock = MockChat::new();

    mock.expect_post_message().returning(move |_, _, _| Ok(placeholder_ts.clone()));
    mock.expect_get_thread_replies().returning(move |_, _| Ok(history.clone()));
    mock.expect_update_message().returning(move |_, ts, text| {
        updates.lock().unwrap().push((ts.to_string(), text.to_string()));
        Ok(())
    });

    mock
}

/// Wait for the placeholder to be edited; the handler runs on a spawned task.
async fn wait_for_update(updates: &Updates, max_attempts: u32, delay_ms: u64) -> (String, String) {
    for _ in 0..max_attempts {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        let recorded = updates.lock().unwrap();
        if let Some(entry) = recorded.first() {
            return entry.clone();
        }
    }

    panic!("Timed out waiting for the placeholder message to be edited.");
}

fn get_test_event(text: &str, thread_ts: Option<&str>) -> MentionEvent {
    MentionEvent {
        channel_id: "C01TEST".to_string(),
        ts: "1234567890.123456".to_string(),
        thread_ts: thread_ts.map(|ts| ts.to_string()),
        text: text.to_string(),
    }
}

// Tests.

#[tokio::test]
async fn test_mention_reply_flow() {
    let updates: Updates = Arc::new(Mutex::new(Vec::new()));

    let history = vec![ThreadMessage {
        author: AuthorKind::Human,
        text: "hello".to_string(),
    }];

    let chat = get_mock_chat("1234567890.200000", history, updates.clone());

    let mut llm = MockLlm::new();
    llm.expect_generate_reply()
        .withf(|turn, transcript| {
            // Text-only mention: the full transcript is sent, system entry first.
            matches!(turn, UserTurn::TextOnly(text) if text == "hello")
                && transcript.len() == 2
                && transcript[0].role == Role::System
                && transcript[0].content == "Speak in the brand voice."
                && transcript[1] == PromptMessage { role: Role::User, content: "hello".to_string() }
        })
        .returning(|_, _| Ok("On-brand reply.".to_string()));

    handle_mention(
        get_test_event("hello", None),
        get_test_config(),
        LlmClient::new(Arc::new(llm)),
        ChatClient::new(Arc::new(chat)),
    );

    let (ts, text) = wait_for_update(&updates, 50, 20).await;

    assert_eq!(ts, "1234567890.200000");
    assert_eq!(text, "On-brand reply.");
}

#[tokio::test]
async fn test_mention_posts_placeholder_into_thread_root() {
    let updates: Updates = Arc::new(Mutex::new(Vec::new()));

    let mut chat = MockChat::new();
    chat.expect_post_message()
        .withf(|_, thread_ts, text| thread_ts == "1234567890.000001" && text == prompts::PLACEHOLDER_REPLY)
        .returning(|_, _, _| Ok("1234567890.300000".to_string()));
    chat.expect_get_thread_replies().returning(|_, _| Ok(Vec::new()));
    {
        let updates = updates.clone();
        chat.expect_update_message().returning(move |_, ts, text| {
            updates.lock().unwrap().push((ts.to_string(), text.to_string()));
            Ok(())
        });
    }

    let mut llm = MockLlm::new();
    llm.expect_generate_reply().returning(|_, _| Ok("Reply.".to_string()));

    handle_mention(
        get_test_event("hi again", Some("1234567890.000001")),
        get_test_config(),
        LlmClient::new(Arc::new(llm)),
        ChatClient::new(Arc::new(chat)),
    );

    let (ts, _) = wait_for_update(&updates, 50, 20).await;

    assert_eq!(ts, "1234567890.300000");
}

#[tokio::test]
async fn test_image_mention_dispatches_vision_turn() {
    let updates: Updates = Arc::new(Mutex::new(Vec::new()));

    // A long history; the vision branch must still fire regardless of it.
    let history = (0..8)
        .map(|i| ThreadMessage {
            author: if i % 2 == 0 { AuthorKind::Human } else { AuthorKind::Bot },
            text: format!("message {i}"),
        })
        .collect::<Vec<_>>();

    let chat = get_mock_chat("1234567890.400000", history, updates.clone());

    let mut llm = MockLlm::new();
    llm.expect_generate_reply()
        .withf(|turn, _| {
            matches!(
                turn,
                UserTurn::WithImage(text, url)
                    if text == "check this out https://example.com/pic.PNG"
                    && url == "https://example.com/pic.PNG"
            )
        })
        .returning(|_, _| Ok("Nice picture.".to_string()));

    handle_mention(
        get_test_event("check this out https://example.com/pic.PNG", None),
        get_test_config(),
        LlmClient::new(Arc::new(llm)),
        ChatClient::new(Arc::new(chat)),
    );

    let (_, text) = wait_for_update(&updates, 50, 20).await;

    assert_eq!(text, "Nice picture.");
}

#[tokio::test]
async fn test_completion_error_edits_placeholder_with_error_string() {
    let updates: Updates = Arc::new(Mutex::new(Vec::new()));

    let chat = get_mock_chat("1234567890.500000", Vec::new(), updates.clone());

    let mut llm = MockLlm::new();
    llm.expect_generate_reply().returning(|_, _| Err(anyhow::anyhow!("rate limited")));

    handle_mention(
        get_test_event("hello?", None),
        get_test_config(),
        LlmClient::new(Arc::new(llm)),
        ChatClient::new(Arc::new(chat)),
    );

    let (ts, text) = wait_for_update(&updates, 50, 20).await;

    // The placeholder is never left as "thinking"; the user sees the fixed error string.
    assert_eq!(ts, "1234567890.500000");
    assert_eq!(text, prompts::ERROR_REPLY);
}

#[tokio::test]
async fn test_thread_fetch_error_edits_placeholder_with_error_string() {
    let updates: Updates = Arc::new(Mutex::new(Vec::new()));

    let mut chat = MockChat::new();
    chat.expect_post_message().returning(|_, _, _| Ok("1234567890.600000".to_string()));
    chat.expect_get_thread_replies().returning(|_, _| Err(anyhow::anyhow!("network down")));
    {
        let updates = updates.clone();
        chat.expect_update_message().returning(move |_, ts, text| {
            updates.lock().unwrap().push((ts.to_string(), text.to_string()));
            Ok(())
        });
    }

    let llm = MockLlm::new();

    handle_mention(
        get_test_event("hello?", None),
        get_test_config(),
        LlmClient::new(Arc::new(llm)),
        ChatClient::new(Arc::new(chat)),
    );

    let (_, text) = wait_for_update(&updates, 50, 20).await;

    assert_eq!(text, prompts::ERROR_REPLY);
}
