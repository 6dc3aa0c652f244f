// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod session;
pub mod typewriter;
pub mod types;

// Re-exports
pub use client::Gemini;
pub use error::{Error, Result};
pub use render::{PlainTextRenderer, Renderer};
pub use session::{
    ChatBackend, ChatSession, DEFAULT_RETRIES, DEFAULT_SYSTEM_INSTRUCTION, GeminiChat,
    SessionStats,
};
pub use typewriter::{DEFAULT_TYPE_DELAY, Typewriter, type_out};
pub use types::*;
