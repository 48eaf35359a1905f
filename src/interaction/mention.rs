use tracing::{Instrument, error, instrument};

use crate::{
    base::{
        config::Config,
        prompts,
        types::{MentionEvent, Res, UserTurn, Void},
    },
    service::{
        chat::ChatClient,
        llm::{self, LlmClient},
    },
};

/// Handles a mention event.
///
/// Spawns a new task per event, so distinct events are processed
/// independently and may complete out of order relative to arrival. No state
/// is shared between tasks.
#[instrument(skip_all)]
pub fn handle_mention(event: MentionEvent, config: Config, llm: LlmClient, chat: ChatClient) {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_mention_internal(event, &config, &llm, &chat).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Internal function to handle a mention event.
///
/// Linear per-event flow: post the placeholder, fetch the thread history,
/// dispatch to the LLM, then edit the placeholder in place with either the
/// reply or the fixed error string. The placeholder edit is the terminal
/// externally observable effect.
#[instrument(skip_all)]
async fn handle_mention_internal(event: MentionEvent, config: &Config, llm: &LlmClient, chat: &ChatClient) -> Void {
    let thread_ts = event.thread_root().to_string();

    // Acknowledge immediately; the placeholder is edited once the reply is ready.
    let placeholder_ts = chat.post_message(&event.channel_id, &thread_ts, prompts::PLACEHOLDER_REPLY).await?;

    match generate_reply(&event, &thread_ts, config, llm, chat).await {
        Ok(reply) => chat.update_message(&event.channel_id, &placeholder_ts, &reply).await,
        Err(err) => {
            // The error detail is logged by the caller; the user only sees the fixed string.
            chat.update_message(&event.channel_id, &placeholder_ts, prompts::ERROR_REPLY).await?;
            Err(err)
        }
    }
}

/// Fetch the thread history and dispatch the completion request.
async fn generate_reply(event: &MentionEvent, thread_ts: &str, config: &Config, llm: &LlmClient, chat: &ChatClient) -> Res<String> {
    let history = chat.get_thread_replies(&event.channel_id, thread_ts).await?;

    let transcript = llm::build_transcript(&config.brand_voice_directive, &history);
    let turn = UserTurn::classify(&event.text);

    llm.generate_reply(&turn, &transcript).await
}
