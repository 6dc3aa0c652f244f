use serde::{Deserialize, Serialize};

use crate::types::Content;

/// One generated reply candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated turn.
    pub content: Content,

    /// Why generation stopped (e.g. "STOP", "MAX_TOKENS").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the API for one request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt (the full conversation sent).
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens in the generated candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Total tokens billed for the request.
    #[serde(default)]
    pub total_token_count: u64,
}

impl std::ops::Add for UsageMetadata {
    type Output = UsageMetadata;

    fn add(self, other: UsageMetadata) -> UsageMetadata {
        UsageMetadata {
            prompt_token_count: self.prompt_token_count + other.prompt_token_count,
            candidates_token_count: self.candidates_token_count + other.candidates_token_count,
            total_token_count: self.total_token_count + other.total_token_count,
        }
    }
}

/// Body of a `generateContent` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; the first is the reply.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Token accounting for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// The reply turn, if the response produced one.
    pub fn content(&self) -> Option<&Content> {
        self.candidates.first().map(|c| &c.content)
    }

    /// Concatenated text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        self.content().map(|c| c.text())
    }
}
