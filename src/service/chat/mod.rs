pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, ThreadMessage, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack. Implementing this trait allows different chat services to be used
/// with the purevoice-bot.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// This sets up the platform's event delivery and begins processing
    /// incoming mention events.
    async fn start(&self) -> Void;

    /// Post a message into a channel thread.
    ///
    /// Returns the timestamp handle of the posted message, which is the key
    /// for editing it later.
    async fn post_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Res<String>;

    /// Edit a previously posted message in place.
    async fn update_message(&self, channel_id: &str, ts: &str, text: &str) -> Void;

    /// Fetch the replies of a thread, oldest first.
    ///
    /// The delivered order is the platform's chronological guarantee and is
    /// preserved as-is.
    async fn get_thread_replies(&self, channel_id: &str, thread_ts: &str) -> Res<Vec<ThreadMessage>>;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
