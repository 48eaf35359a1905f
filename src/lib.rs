//! Library root for `purevoice-bot`.
//!
//! Purevoice-bot is an OpenAI-powered brand-voice assistant for Slack designed to:
//! - Answer @-mentions in the channel's thread with on-brand copy
//! - Carry the full thread history into the completion request
//! - Switch to a single-turn vision request when the mention contains an image URL
//!
//! The bot integrates with Slack for chat and OpenAI for responses. The
//! architecture is built around extensible traits that allow for different
//! implementations of each service.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the purevoice-bot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and chat clients
/// - Starts the events listener for processing mentions
pub async fn start(config: Config) -> Void {
    info!("Starting purevoice-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider().install_default().unwrap();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
