//! Chat session management.
//!
//! This module provides the conversation handle backed by the Gemini API
//! and the retry wrapper around it. The wrapper owns the one piece of
//! decision logic in this crate: absorbing transient server overload with
//! linearly growing backoff, while every other failure propagates untouched.

use std::time::Duration;

use crate::client::Gemini;
use crate::error::{Error, Result};
use crate::observability;
use crate::typewriter::{DEFAULT_TYPE_DELAY, Typewriter, type_out};
use crate::types::{
    Content, GenerateContentRequest, Model, SystemInstruction, UsageMetadata,
};

/// Default number of send attempts before giving up on a continuously
/// overloaded model.
pub const DEFAULT_RETRIES: u32 = 4;

/// Default system instruction for new conversations.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a useful assistant. Answer the questions. Be brief in your responses.";

/// The remote conversation capability the retry wrapper is built over.
///
/// Implementations own the ordered, append-only transcript; a failed send
/// must leave the transcript untouched. Keeping this seam minimal lets the
/// retry logic in [`ChatSession`] run against a substitutable fake.
#[async_trait::async_trait]
pub trait ChatBackend: Send {
    /// Deliver one user message and return the model's full text reply.
    ///
    /// On success the transcript grows by exactly one user turn and one
    /// model turn.
    async fn send(&mut self, message: &str) -> Result<String>;

    /// Read-only snapshot of all turns so far, in chronological order.
    fn history(&self) -> &[Content];
}

/// A conversation handle backed by the Gemini `generateContent` API.
///
/// The API itself is stateless; this handle owns the transcript and resends
/// it in full on every turn, which is how the hosted session abstraction is
/// realized client-side.
pub struct GeminiChat {
    client: Gemini,
    model: Model,
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    usage_totals: UsageMetadata,
    last_turn_usage: Option<UsageMetadata>,
}

impl GeminiChat {
    /// Creates a conversation with the default system instruction.
    pub fn new(client: Gemini, model: Model) -> Self {
        Self {
            client,
            model,
            system_instruction: SystemInstruction::new(DEFAULT_SYSTEM_INSTRUCTION),
            contents: Vec::new(),
            usage_totals: UsageMetadata::default(),
            last_turn_usage: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<SystemInstruction>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Changes the model used for subsequent turns.
    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    /// Replaces the system instruction for subsequent turns.
    pub fn set_system_instruction(&mut self, instruction: impl Into<SystemInstruction>) {
        self.system_instruction = instruction.into();
    }

    /// Clears the transcript, starting a fresh conversation.
    pub fn clear(&mut self) {
        self.contents.clear();
    }

    /// Token totals across all requests in this conversation.
    pub fn usage_totals(&self) -> UsageMetadata {
        self.usage_totals
    }

    /// Token accounting for the most recent successful turn, if any.
    pub fn last_turn_usage(&self) -> Option<UsageMetadata> {
        self.last_turn_usage
    }
}

#[async_trait::async_trait]
impl ChatBackend for GeminiChat {
    async fn send(&mut self, message: &str) -> Result<String> {
        let previous_len = self.contents.len();
        self.contents.push(Content::user(message));

        let request = GenerateContentRequest::new(self.contents.clone())
            .with_system_instruction(self.system_instruction.clone());

        match self.client.generate(&self.model, request).await {
            Ok(response) => {
                let Some(content) = response.content().cloned() else {
                    self.contents.truncate(previous_len);
                    return Err(Error::api(
                        200,
                        None,
                        "response contained no candidates".to_string(),
                    ));
                };
                let reply = content.text();
                self.contents.push(content);
                if let Some(usage) = response.usage_metadata {
                    self.usage_totals = self.usage_totals + usage;
                    self.last_turn_usage = Some(usage);
                }
                Ok(reply)
            }
            Err(err) => {
                self.contents.truncate(previous_len);
                Err(err)
            }
        }
    }

    fn history(&self) -> &[Content] {
        &self.contents
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of turns in the transcript.
    pub message_count: usize,
    /// The configured retry limit.
    pub retries: u32,
    /// Total number of API calls made, retries included.
    pub total_requests: u64,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total reply tokens across all requests.
    pub total_reply_tokens: u64,
    /// Prompt tokens for the last turn, if available.
    pub last_turn_prompt_tokens: Option<u64>,
    /// Reply tokens for the last turn, if available.
    pub last_turn_reply_tokens: Option<u64>,
}

/// A chat session wrapping a backend with bounded retry on overload.
///
/// At most one send is outstanding at a time; a send, once issued, runs to
/// completion, success, or exhaustion.
pub struct ChatSession<B: ChatBackend> {
    backend: B,
    retries: u32,
    type_delay: Duration,
    request_count: u64,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new session over the given backend with default settings.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retries: DEFAULT_RETRIES,
            type_delay: DEFAULT_TYPE_DELAY,
            request_count: 0,
        }
    }

    /// Sets the number of send attempts per message.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the pacing delay used by [`ChatSession::respond`].
    pub fn with_type_delay(mut self, delay: Duration) -> Self {
        self.type_delay = delay;
        self
    }

    /// Returns the configured retry limit.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Changes the retry limit for subsequent sends.
    pub fn set_retries(&mut self, retries: u32) {
        self.retries = retries;
    }

    /// Returns the pacing delay used by [`ChatSession::respond`].
    pub fn type_delay(&self) -> Duration {
        self.type_delay
    }

    /// Changes the pacing delay used by [`ChatSession::respond`].
    pub fn set_type_delay(&mut self, delay: Duration) {
        self.type_delay = delay;
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns a mutable reference to the underlying backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Read-only snapshot of all turns so far, in chronological order.
    pub fn history(&self) -> &[Content] {
        self.backend.history()
    }

    /// Returns the number of turns in the transcript.
    pub fn message_count(&self) -> usize {
        self.backend.history().len()
    }

    /// Sends a user message and returns the model's full text reply.
    ///
    /// The message is delivered up to `retries` times. An attempt that fails
    /// with the overload signal sleeps `2 * attempt_number` seconds (linear,
    /// 1-indexed) before the next attempt; any other failure propagates
    /// immediately. When every attempt fails with overload, the send fails
    /// with a retry exhaustion error carrying the attempt count.
    ///
    /// # Errors
    ///
    /// Returns a validation error on empty input, the first non-overload
    /// error encountered, or retry exhaustion.
    pub async fn send(&mut self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(Error::validation(
                "message must be non-empty",
                Some("message".to_string()),
            ));
        }

        observability::SESSION_SENDS.click();
        for attempt in 1..=self.retries {
            self.request_count += 1;
            match self.backend.send(message).await {
                Ok(reply) => return Ok(reply),
                Err(Error::Overloaded { .. }) if attempt < self.retries => {
                    let backoff = Duration::from_secs(2 * u64::from(attempt));
                    observability::SESSION_RETRIES.click();
                    observability::SESSION_RETRY_BACKOFF.add(backoff.as_secs_f64());
                    tokio::time::sleep(backoff).await;
                }
                Err(Error::Overloaded { .. }) => {
                    observability::SESSION_RETRIES_EXHAUSTED.click();
                    return Err(Error::retry_exhausted(self.retries));
                }
                Err(err) => return Err(err),
            }
        }

        // Only reachable with a retry limit of zero.
        observability::SESSION_RETRIES_EXHAUSTED.click();
        Err(Error::retry_exhausted(self.retries))
    }

    /// Sends a user message and returns the reply as a paced stream of
    /// growing prefixes, for incremental display.
    ///
    /// This is the UI entry point. Any transcript the caller keeps for
    /// display purposes is deliberately not consulted; the backend owns the
    /// conversation state. Dropping the stream stops further production but
    /// never cancels the already-completed remote call.
    pub async fn respond(&mut self, message: &str) -> Result<Typewriter> {
        let reply = self.send(message).await?;
        Ok(type_out(reply, self.type_delay))
    }
}

impl ChatSession<GeminiChat> {
    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let usage = self.backend.usage_totals();
        SessionStats {
            model: self.backend.model().clone(),
            message_count: self.message_count(),
            retries: self.retries,
            total_requests: self.request_count,
            total_prompt_tokens: usage.prompt_token_count,
            total_reply_tokens: usage.candidates_token_count,
            last_turn_prompt_tokens: self
                .backend
                .last_turn_usage()
                .map(|usage| usage.prompt_token_count),
            last_turn_reply_tokens: self
                .backend
                .last_turn_usage()
                .map(|usage| usage.candidates_token_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::types::Role;
    use tokio_test::assert_ok;

    /// A scripted backend standing in for the remote conversation.
    struct FakeBackend {
        script: VecDeque<Result<String>>,
        calls: usize,
        contents: Vec<Content>,
    }

    impl FakeBackend {
        fn new(script: Vec<Result<String>>) -> Self {
            Self {
                script: script.into(),
                calls: 0,
                contents: Vec::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for FakeBackend {
        async fn send(&mut self, message: &str) -> Result<String> {
            self.calls += 1;
            match self.script.pop_front().expect("script exhausted") {
                Ok(reply) => {
                    self.contents.push(Content::user(message));
                    self.contents.push(Content::model(reply.clone()));
                    Ok(reply)
                }
                Err(err) => Err(err),
            }
        }

        fn history(&self) -> &[Content] {
            &self.contents
        }
    }

    #[tokio::test]
    async fn success_appends_one_turn_pair() {
        let backend = FakeBackend::new(vec![Ok("Hi there".to_string())]);
        let mut session = ChatSession::new(backend);

        let reply = assert_ok!(session.send("Hello").await);
        assert!(!reply.is_empty());
        assert_eq!(reply, "Hi there");

        assert_eq!(session.backend().calls, 1);
        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].text(), "Hello");
        assert_eq!(history[1].role, Role::Model);
        assert_eq!(history[1].text(), "Hi there");
    }

    #[tokio::test(start_paused = true)]
    async fn overload_retries_with_linear_backoff() {
        let backend = FakeBackend::new(vec![
            Err(Error::overloaded("busy", None)),
            Err(Error::overloaded("busy", None)),
            Ok("finally".to_string()),
        ]);
        let mut session = ChatSession::new(backend);

        let start = tokio::time::Instant::now();
        let reply = assert_ok!(session.send("Hello").await);
        assert_eq!(reply, "finally");

        // Two failures: backoffs of 2s and 4s before the third attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
        assert_eq!(session.backend().calls, 3);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn overload_exhausts_after_configured_retries() {
        let backend = FakeBackend::new(vec![
            Err(Error::overloaded("busy", None)),
            Err(Error::overloaded("busy", None)),
            Err(Error::overloaded("busy", None)),
            Err(Error::overloaded("busy", None)),
        ]);
        let mut session = ChatSession::new(backend);
        assert_eq!(session.retries(), DEFAULT_RETRIES);

        let start = tokio::time::Instant::now();
        let err = session.send("Hello").await.unwrap_err();
        assert!(err.is_retry_exhausted());
        assert_eq!(err.attempts(), Some(4));

        // Backoff runs between attempts only: 2s + 4s + 6s.
        assert_eq!(start.elapsed(), Duration::from_secs(12));
        assert_eq!(session.backend().calls, 4);
        assert!(session.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn non_overload_error_propagates_immediately() {
        let backend = FakeBackend::new(vec![Err(Error::authentication("bad key"))]);
        let mut session = ChatSession::new(backend);

        let start = tokio::time::Instant::now();
        let err = session.send("Hello").await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(session.backend().calls, 1);
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let backend = FakeBackend::new(vec![Err(Error::rate_limit("slow down", Some(30)))]);
        let mut session = ChatSession::new(backend);

        let err = session.send("Hello").await.unwrap_err();
        assert!(err.is_rate_limit());
        assert_eq!(session.backend().calls, 1);
    }

    #[tokio::test]
    async fn empty_message_rejected_before_any_call() {
        let backend = FakeBackend::new(vec![]);
        let mut session = ChatSession::new(backend);

        let err = session.send("   ").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.backend().calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_retry_limit_is_honored() {
        let backend = FakeBackend::new(vec![
            Err(Error::overloaded("busy", None)),
            Err(Error::overloaded("busy", None)),
        ]);
        let mut session = ChatSession::new(backend).with_retries(2);

        let err = session.send("Hello").await.unwrap_err();
        assert_eq!(err.attempts(), Some(2));
        assert_eq!(session.backend().calls, 2);
    }

    #[tokio::test]
    async fn consecutive_turns_accumulate_history() {
        let backend = FakeBackend::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]);
        let mut session = ChatSession::new(backend);

        session.send("one").await.unwrap();
        session.send("two").await.unwrap();

        let history = session.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].text(), "two");
        assert_eq!(history[3].text(), "second");
    }
}
