//! LLM-backed candidate reranking.

use async_trait::async_trait;

use crate::core::error::Result;
use crate::core::llm::client::{ChatClient, ChatMessage, JsonReply};
use crate::core::rerank::{parse_scores, RerankCandidate, RerankOutcome, Reranker};
use crate::core::routing::TaskMode;

/// Asks the model for a relevance score per candidate
#[derive(Debug, Clone)]
pub struct LlmReranker {
    client: ChatClient,
}

impl LlmReranker {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    fn prompt(task: &str, mode: TaskMode, candidates: &[RerankCandidate]) -> Result<String> {
        let listing = serde_json::to_string_pretty(candidates)?;
        Ok(format!(
            r#"
You are a retrieval reranker.
Given a task and candidate chunks, score each candidate relevance between 0 and 1.
Task mode: {mode}
Task: {task}

Candidates:
{listing}

Return ONLY valid JSON with this schema:
{{
  "scores": [
    {{ "id": 1, "score": 0.92, "reason": "short reason" }}
  ]
}}
Rules:
- Only include ids from the provided candidates.
- score must be between 0 and 1.
- Higher means more relevant.
"#
        ))
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    async fn rerank(
        &self,
        task: &str,
        mode: TaskMode,
        candidates: &[RerankCandidate],
    ) -> RerankOutcome {
        let prompt = match Self::prompt(task, mode, candidates) {
            Ok(p) => p,
            Err(e) => {
                return RerankOutcome::Fallback {
                    reason: e.to_string(),
                }
            }
        };

        match self.client.chat_json(&[ChatMessage::user(prompt)], 0.0).await {
            Ok(JsonReply::Parsed(value)) => match parse_scores(&value) {
                Some(scores) => RerankOutcome::Scored(scores),
                None => RerankOutcome::Fallback {
                    reason: "rerank reply has no scores array".to_string(),
                },
            },
            Ok(JsonReply::Raw(_)) => RerankOutcome::Fallback {
                reason: "rerank reply was not valid JSON".to_string(),
            },
            Err(e) => RerankOutcome::Fallback {
                reason: e.to_string(),
            },
        }
    }
}
