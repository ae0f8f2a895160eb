//! LLM-backed task routing.

use async_trait::async_trait;

use crate::core::llm::client::{ChatClient, ChatMessage, JsonReply};
use crate::core::routing::{sanitize_queries, QueryRouter, RouteOutcome, TaskMode};

/// Classifies the task and rewrites it into retrieval queries
#[derive(Debug, Clone)]
pub struct LlmRouter {
    client: ChatClient,
}

impl LlmRouter {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    fn prompt(task: &str) -> String {
        format!(
            r#"
Classify the user task into one of: summary, code, chat.
Also rewrite the task into 1-3 concise retrieval queries for source-code search.

User task:
{task}

Return ONLY valid JSON with this schema:
{{
  "mode": "summary|code|chat",
  "rewritten_queries": ["query1", "query2"]
}}
"#
        )
    }
}

/// Turn a routing reply into a route.
///
/// An unknown or missing mode falls back to the heuristic mode; only
/// string entries of `rewritten_queries` are used.
pub fn parse_route(task: &str, reply: &serde_json::Value) -> RouteOutcome {
    let Some(object) = reply.as_object() else {
        return RouteOutcome::Fallback {
            reason: "routing reply is not a JSON object".to_string(),
        };
    };

    let mode = object
        .get("mode")
        .and_then(|m| m.as_str())
        .and_then(|m| m.parse::<TaskMode>().ok())
        .unwrap_or_else(|| TaskMode::infer_heuristic(task));

    let rewritten: Vec<String> = object
        .get("rewritten_queries")
        .and_then(|q| q.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|q| q.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    RouteOutcome::Routed {
        mode,
        queries: sanitize_queries(task, &rewritten),
    }
}

#[async_trait]
impl QueryRouter for LlmRouter {
    async fn route(&self, task: &str) -> RouteOutcome {
        let messages = [ChatMessage::user(Self::prompt(task))];

        match self.client.chat_json(&messages, 0.0).await {
            Ok(JsonReply::Parsed(value)) => parse_route(task, &value),
            Ok(JsonReply::Raw(_)) => RouteOutcome::Fallback {
                reason: "routing reply was not valid JSON".to_string(),
            },
            Err(e) => RouteOutcome::Fallback {
                reason: e.to_string(),
            },
        }
    }
}
