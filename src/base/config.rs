//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI model to use
fn default_openai_model() -> String {
    "gpt-4-turbo".to_string()
}

/// Default sampling temperature for the OpenAI model
fn default_openai_temperature() -> f32 {
    0.7
}

/// Default max output tokens for the OpenAI model
fn default_openai_max_tokens() -> u32 {
    4096
}

/// Default brand voice system directive.
fn default_brand_voice_directive() -> String {
    prompts::BRAND_VOICE_DIRECTIVE.to_string()
}

/// Default port for the Slack events listener.
fn default_listen_port() -> u16 {
    3000
}

/// Configuration for the purevoice-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// The shared, reference-counted inner configuration.
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// The concrete configuration fields for the purevoice-bot application.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// OpenAI model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Optional custom system directive to override the default (`BRAND_VOICE_DIRECTIVE`).
    #[serde(default = "default_brand_voice_directive")]
    pub brand_voice_directive: String,
    /// Sampling temperature to use for the OpenAI model (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for the OpenAI model (`OPENAI_MAX_TOKENS`).
    /// Maximum number of tokens that can be generated in the response.
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Slack signing secret (`SLACK_SIGNING_SECRET`).
    pub slack_signing_secret: String,
    /// Port for the Slack events listener (`LISTEN_PORT`).
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Config {
    /// Load configuration from the optional explicit path (or the default
    /// location) layered over `PUREVOICE`-prefixed environment variables.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("PUREVOICE"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.openai_temperature < 0.0 || result.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if result.openai_max_tokens < 1 || result.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        Ok(result)
    }
}
