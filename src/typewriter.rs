//! Typewriter pacing for full-text replies.
//!
//! The remote call is not streaming: the session wrapper returns the whole
//! reply at once. This module converts that reply into a lazy sequence of
//! cumulative prefixes, one per character, with a fixed pause before each,
//! so a UI can display it at a human reading pace. The pause is a
//! cooperative suspension point; consumers interleave rendering with other
//! event processing, and dropping the stream simply stops production.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::Stream;
use futures::stream::{self, StreamExt};

/// Default pause before each emitted prefix.
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(30);

/// A finite stream of cumulative reply prefixes.
///
/// Each item extends the previous by exactly one character; the final item
/// is the full reply. The stream is not restartable — each reply produces a
/// fresh one.
pub struct Typewriter {
    inner: Pin<Box<dyn Stream<Item = String> + Send>>,
}

impl Typewriter {
    /// Collects the remaining prefixes into a vector.
    pub async fn collect_remaining(mut self) -> Vec<String> {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next().await {
            chunks.push(chunk);
        }
        chunks
    }
}

impl Stream for Typewriter {
    type Item = String;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}

/// Converts a full reply into a paced stream of growing prefixes.
///
/// Splits on character boundaries, so multi-byte text never tears.
pub fn type_out(reply: String, delay: Duration) -> Typewriter {
    let inner = stream::unfold((reply, 0usize), move |(reply, emitted)| async move {
        let next = reply[emitted..].chars().next()?;
        tokio::time::sleep(delay).await;
        let emitted = emitted + next.len_utf8();
        let prefix = reply[..emitted].to_string();
        Some((prefix, (reply, emitted)))
    });
    Typewriter {
        inner: Box::pin(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_each_cumulative_prefix_exactly_once() {
        let chunks = type_out("Hi there".to_string(), DEFAULT_TYPE_DELAY)
            .collect_remaining()
            .await;

        assert_eq!(
            chunks,
            vec!["H", "Hi", "Hi ", "Hi t", "Hi th", "Hi the", "Hi ther", "Hi there"]
        );
        for pair in chunks.windows(2) {
            assert!(pair[1].starts_with(&pair[0]));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn paces_one_delay_per_character() {
        let start = tokio::time::Instant::now();
        let chunks = type_out("Hi there".to_string(), DEFAULT_TYPE_DELAY)
            .collect_remaining()
            .await;

        assert_eq!(chunks.len(), 8);
        assert_eq!(start.elapsed(), Duration::from_millis(30 * 8));
    }

    #[tokio::test(start_paused = true)]
    async fn splits_multibyte_text_on_char_boundaries() {
        let chunks = type_out("héllo".to_string(), DEFAULT_TYPE_DELAY)
            .collect_remaining()
            .await;

        assert_eq!(chunks, vec!["h", "hé", "hél", "héll", "héllo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_reply_produces_no_chunks() {
        let chunks = type_out(String::new(), DEFAULT_TYPE_DELAY)
            .collect_remaining()
            .await;
        assert!(chunks.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_mid_stream_stops_production() {
        let mut stream = type_out("Hi there".to_string(), DEFAULT_TYPE_DELAY);
        let first = stream.next().await;
        assert_eq!(first.as_deref(), Some("H"));
        drop(stream);
    }
}
