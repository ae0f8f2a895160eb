//! LLM collaborator: an OpenAI-compatible chat client and the router
//! and reranker built on it.
//!
//! Every failure here is turned into a fallback outcome by the router
//! and reranker; retrieval never depends on the service being up.

mod client;
mod reranker;
mod router;

pub use client::{ChatClient, ChatMessage, JsonReply, Role, DEFAULT_TEMPERATURE};
pub use reranker::LlmReranker;
pub use router::{parse_route, LlmRouter};
