//! Chat application module for interactive conversations with Gemini.
//!
//! This module provides the REPL-facing pieces built on top of the gemchat
//! client library:
//!
//! - [`config`]: configuration file loading and CLI argument parsing
//! - [`commands`]: slash command parsing and handling
//!
//! Session management itself lives in [`crate::session`]; output rendering
//! in [`crate::render`].

mod commands;
mod config;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_CONFIG_PATH, FileConfig};
