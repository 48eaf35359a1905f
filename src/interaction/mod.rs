//! Event handling for purevoice-bot.
//!
//! This module provides functionality for handling mention events:
//! - Posting and editing the placeholder reply
//! - Coordinating the thread history, transcript, and completion services

pub mod mention;
