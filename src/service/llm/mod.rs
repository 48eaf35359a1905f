pub mod openai;

use crate::base::types::{AuthorKind, PromptMessage, Res, Role, ThreadMessage, UserTurn};
use async_trait::async_trait;
use std::sync::Arc;
use std::ops::Deref;

// Functions.

/// Build the prompt transcript for a thread.
///
/// The system directive is always the first entry. Every history entry
/// follows in delivered order, bot-authored messages as `Assistant` and
/// human-authored messages as `User`, text unmodified. Nothing is dropped,
/// including empty messages, so the output length is always
/// `history.len() + 1`.
pub fn build_transcript(system_directive: &str, history: &[ThreadMessage]) -> Vec<PromptMessage> {
    let mut transcript = Vec::with_capacity(history.len() + 1);

    transcript.push(PromptMessage {
        role: Role::System,
        content: system_directive.to_string(),
    });

    for message in history {
        let role = match message.author {
            AuthorKind::Bot => Role::Assistant,
            AuthorKind::Human => Role::User,
        };

        transcript.push(PromptMessage {
            role,
            content: message.text.clone(),
        });
    }

    transcript
}

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// This trait defines the core functionality for interacting with large language models.
/// Implementing this trait allows different LLM providers to be used with the purevoice-bot.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Generate a reply for the user's latest turn.
    ///
    /// A `WithImage` turn becomes a single-turn vision request holding only
    /// the system directive and the turn itself; the transcript argument is
    /// ignored on that branch. A `TextOnly` turn sends the full transcript
    /// unmodified. Which branch runs is a pure function of the inputs.
    ///
    /// Returns the completion text, substituting the fixed per-branch
    /// fallback when the model returns nothing. Transport errors are not
    /// retried and propagate to the caller.
    async fn generate_reply(&self, turn: &UserTurn, transcript: &[PromptMessage]) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }
}

// Tests.
