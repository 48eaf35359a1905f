//! Integration with Large Language Model services.
//!
//! This module provides a thin wrapper around an LLM client (OpenAI) for
//! generating brand-voice replies. The user's latest turn selects the request
//! shape: a turn carrying an image URL becomes a single-turn vision request,
//! anything else sends the full thread transcript.

use std::sync::Arc;

use crate::base::{
    config::Config,
    prompts,
    types::{PromptMessage, Res, Role, UserTurn},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs, ChatCompletionRequestMessageContentPartTextArgs,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ImageUrlArgs,
    },
};
use async_trait::async_trait;
use tracing::{info, instrument};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone());

        Self {
            client: Client::with_config(cfg),
            config: config.clone(),
        }
    }

    /// Build the text-only message list: the transcript, verbatim.
    fn build_text_messages(&self, transcript: &[PromptMessage]) -> Res<Vec<ChatCompletionRequestMessage>> {
        transcript
            .iter()
            .map(|message| -> Res<ChatCompletionRequestMessage> {
                let message = match message.role {
                    Role::System => ChatCompletionRequestSystemMessageArgs::default().content(message.content.as_str()).build()?.into(),
                    Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default().content(message.content.as_str()).build()?.into(),
                    Role::User => ChatCompletionRequestUserMessageArgs::default().content(message.content.as_str()).build()?.into(),
                };

                Ok(message)
            })
            .collect()
    }

    /// Build the single-turn vision message list: the system directive plus
    /// one user turn carrying the mention text and the image reference.
    /// Thread context is intentionally not part of this request.
    fn build_vision_messages(&self, text: &str, image_url: &str) -> Res<Vec<ChatCompletionRequestMessage>> {
        let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
            ChatCompletionRequestMessageContentPartTextArgs::default().text(text).build()?.into(),
            ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(ImageUrlArgs::default().url(image_url).build()?)
                .build()?
                .into(),
        ];

        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default().content(self.config.brand_voice_directive.as_str()).build()?.into(),
            ChatCompletionRequestUserMessageArgs::default().content(parts).build()?.into(),
        ])
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::generate_reply", skip_all)]
    async fn generate_reply(&self, turn: &UserTurn, transcript: &[PromptMessage]) -> Res<String> {
        let (messages, fallback) = match turn {
            UserTurn::WithImage(text, image_url) => {
                info!("Image URL detected; sending a single-turn vision request ...");
                (self.build_vision_messages(text, image_url)?, prompts::VISION_FALLBACK_REPLY)
            }
            UserTurn::TextOnly(_) => (self.build_text_messages(transcript)?, prompts::TEXT_FALLBACK_REPLY),
        };

        // Prepare the request. No retry and no deadline here: timeouts belong
        // to the HTTP client, and errors surface to the event handler.

        let mut request = CreateChatCompletionRequestArgs::default();

        request.model(&self.config.openai_model).max_completion_tokens(self.config.openai_max_tokens).messages(messages);

        // o-series models reject a sampling temperature.
        if self.config.openai_model.starts_with("gpt") {
            request.temperature(self.config.openai_temperature);
        }

        let response = self.client.chat().create(request.build()?).await?;

        Ok(reply_text(response, fallback))
    }
}

/// Pull the first choice's text out of a completion response, substituting
/// `fallback` when the model returned nothing.
fn reply_text(response: CreateChatCompletionResponse, fallback: &str) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// Tests.
