//! Chat service integration for purevoice-bot.
//!
//! This module provides functionality for interacting with chat platforms like Slack:
//! - Receiving mention events over the HTTP Events API
//! - Posting and editing thread replies
//! - Retrieving thread history
//!
//! It defines the Slack implementation of the `GenericChatClient` trait.
//! Event delivery and request signature verification are owned by the
//! slack-morphism listener; this module only consumes verified events.

use crate::{
    base::{
        config::Config,
        types::{AuthorKind, MentionEvent, Res, ThreadMessage, Void},
    },
    interaction,
    service::llm::LlmClient,
};
use async_trait::async_trait;
use axum::{Extension, response::IntoResponse};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::{errors::SlackClientError, prelude::*};
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

use std::{ops::Deref, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub fn slack(config: &Config, llm: LlmClient) -> Res<Self> {
        let client = SlackChatClient::new(config, llm)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack events listener.
struct SlackUserState {
    config: Config,
    llm: LlmClient,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub bot_token: SlackApiToken,
    pub signing_secret: SlackSigningSecret,
    pub client: Arc<FullClient>,
    pub config: Config,
    pub llm: LlmClient,
}

impl Deref for SlackChatClient {
    type Target = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub fn new(config: &Config, llm: LlmClient) -> Res<Self> {
        // Initialize tokens.

        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));
        let signing_secret: SlackSigningSecret = config.slack_signing_secret.clone().into();

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        Ok(Self {
            bot_token,
            signing_secret,
            client,
            config: config.clone(),
            llm,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self) -> Void {
        // Initialize the events listener environment.

        let listener_environment: Arc<SlackHyperListenerEnvironment> = Arc::new(
            SlackClientEventsListenerEnvironment::new(self.client.clone())
                .with_error_handler(handle_listener_error)
                .with_user_state(SlackUserState {
                    config: self.config.clone(),
                    llm: self.llm.clone(),
                    chat: ChatClient::from(self.clone()),
                }),
        );

        let listener: SlackEventsAxumListener<SlackHyperHttpsConnector> = SlackEventsAxumListener::new(listener_environment);

        // Build the events route; signature verification happens in the layer.

        let app = axum::routing::Router::new().route(
            "/push",
            axum::routing::post(handle_push_event).layer(listener.events_layer(&self.signing_secret).with_event_extractor(SlackEventsExtractors::push_event())),
        );

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.listen_port));
        info!("Slack events listener on {}", addr);

        axum::serve(TcpListener::bind(&addr).await?, app).await?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel_id: &str, thread_ts: &str, text: &str) -> Res<String> {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message)
            .with_as_user(true)
            .with_thread_ts(SlackTs(thread_ts.to_string()))
            .with_link_names(true);

        let session = self.client.open_session(&self.bot_token);

        let response = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to post message: {}", e))?;

        Ok(response.ts.0)
    }

    #[instrument(skip(self, text))]
    async fn update_message(&self, channel_id: &str, ts: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let request = SlackApiChatUpdateRequest::new(SlackChannelId(channel_id.to_string()), message, SlackTs(ts.to_string()));

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_update(&request).await.map_err(|e| anyhow::anyhow!("Failed to update message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_thread_replies(&self, channel_id: &str, thread_ts: &str) -> Res<Vec<ThreadMessage>> {
        let request = SlackApiConversationsRepliesRequest::new(SlackChannelId(channel_id.to_string()), SlackTs(thread_ts.to_string()));
        let session = self.client.open_session(&self.bot_token);

        let response = session.conversations_replies(&request).await;

        let response = if let Err(e) = &response
            && let SlackClientError::ApiError(ae) = e
            && ae.code == "thread_not_found"
        {
            // If the thread is not found (due to this being a top-level message), the history is just empty.
            return Ok(Vec::new());
        } else {
            response?
        };

        // Replies arrive oldest first; keep that order.
        let messages = response
            .messages
            .into_iter()
            .map(|message| {
                let author = if message.sender.bot_id.is_some() { AuthorKind::Bot } else { AuthorKind::Human };

                ThreadMessage {
                    author,
                    text: message.content.text.unwrap_or_default(),
                }
            })
            .collect();

        Ok(messages)
    }
}

// Axum handlers for the Slack events listener.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(Extension(environment): Extension<Arc<SlackHyperListenerEnvironment>>, Extension(event): Extension<SlackPushEvent>) -> axum::response::Response {
    match event {
        SlackPushEvent::UrlVerification(url_verification) => url_verification.challenge.into_response(),
        SlackPushEvent::EventCallback(event_callback) => {
            let states = environment.user_state.read().await;

            let Some(user_state) = states.get_user_state::<SlackUserState>() else {
                error!("Failed to get user state");
                return ().into_response();
            };

            match event_callback.event {
                SlackEventCallbackBody::AppMention(mention) => {
                    info!("Received app mention event ...");

                    let event = MentionEvent {
                        channel_id: mention.channel.0.clone(),
                        ts: mention.origin.ts.0.clone(),
                        thread_ts: mention.origin.thread_ts.clone().map(|ts| ts.0),
                        text: mention.content.text.clone().unwrap_or_default(),
                    };

                    interaction::mention::handle_mention(event, user_state.config.clone(), user_state.llm.clone(), user_state.chat.clone());
                }
                _ => {
                    warn!("Received unhandled push event.")
                }
            }

            ().into_response()
        }
        _ => ().into_response(),
    }
}

/// Handles errors raised inside the events listener layer.
fn handle_listener_error(err: Box<dyn std::error::Error + Send + Sync>, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> HttpStatusCode {
    error!("Slack events listener error: {}", err);
    HttpStatusCode::BAD_REQUEST
}

// Tests.

#[cfg(test)]
mod tests {
    // The Slack client is exercised against the real API; unit tests cover
    // the pure logic this module delegates to (`base::media`, `service::llm`,
    // `interaction::mention`).
}
