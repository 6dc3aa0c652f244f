//! Integration tests for the gemchat library.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use gemchat::{ChatSession, Gemini, GeminiChat, Model};

    #[tokio::test]
    async fn test_simple_send() {
        // This test requires GEMINI_API_KEY to be set
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");
        let chat = GeminiChat::new(client, Model::default());
        let mut session = ChatSession::new(chat);

        let reply = session.send("Say 'test passed'").await;
        assert!(reply.is_ok(), "Request should succeed with valid API key");
        assert!(!reply.unwrap().is_empty());
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_typed_response() {
        use futures::StreamExt;

        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");
        let chat = GeminiChat::new(client, Model::default());
        let mut session = ChatSession::new(chat);

        let stream = session.respond("Count to 3").await;
        assert!(stream.is_ok(), "Request should succeed");

        let mut stream = stream.unwrap();
        let mut last = String::new();
        while let Some(chunk) = stream.next().await {
            assert!(chunk.starts_with(&last));
            last = chunk;
        }
        assert!(!last.is_empty());
    }
}
