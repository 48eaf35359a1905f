//! Common types, result aliases, and the domain model for the bot.

use serde::{Deserialize, Serialize};

use crate::base::media;

/// The crate-wide error type.
pub type Err = anyhow::Error;
/// Result specialized to the crate-wide error type.
pub type Res<T> = Result<T, Err>;
/// A `Result` carrying no success value.
pub type Void = Res<()>;

/// Who authored a message in a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorKind {
    /// Authored by the bot itself.
    Bot,
    /// Authored by a human participant.
    Human,
}

/// One message of a fetched thread.
///
/// Threads are delivered oldest-first, and that order is preserved all the
/// way into the prompt transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    /// Who authored this message.
    pub author: AuthorKind,
    /// The message's text content.
    pub text: String,
}

/// Role of one prompt message sent to the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The system directive role.
    System,
    /// A message authored by the assistant (the bot).
    Assistant,
    /// A message authored by the user.
    User,
}

/// One entry of the prompt transcript sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// The role of this prompt entry.
    pub role: Role,
    /// The textual content of this prompt entry.
    pub content: String,
}

/// An @-mention of the bot, as delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEvent {
    /// The channel the mention was posted in.
    pub channel_id: String,
    /// The mention message's own timestamp.
    pub ts: String,
    /// The thread timestamp, present when the mention is a reply.
    pub thread_ts: Option<String>,
    /// The raw text of the mention.
    pub text: String,
}

impl MentionEvent {
    /// The thread this mention belongs to: `thread_ts` when the mention is a
    /// reply, otherwise the mention's own timestamp (a new thread root).
    pub fn thread_root(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

/// Shape of the user's latest turn, decided once per event.
///
/// `WithImage` carries the raw mention text and the extracted image URL; the
/// dispatcher sends it as a single-turn vision request and discards the rest
/// of the thread transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserTurn {
    /// A text-only turn carrying the mention text.
    TextOnly(String),
    /// A turn carrying the mention text and an extracted image URL.
    WithImage(String, String),
}

impl UserTurn {
    /// Classify a mention text by probing it for an embedded image URL.
    pub fn classify(text: &str) -> Self {
        match media::extract_image_url(text) {
            Some(url) => Self::WithImage(text.to_string(), url.to_string()),
            None => Self::TextOnly(text.to_string()),
        }
    }
}
