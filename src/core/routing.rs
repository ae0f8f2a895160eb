//! Task routing: which kind of answer a task wants, and which
//! retrieval queries to run for it.
//!
//! A [`QueryRouter`] may classify the task and rewrite it into search
//! queries. When no router is available, or it falls back, a keyword
//! heuristic picks the mode and the task itself is the only query.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Raw entries considered before de-duplication
const QUERY_WINDOW: usize = 6;

/// Queries kept after de-duplication
pub const MAX_ROUTED_QUERIES: usize = 4;

static SUMMARY_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"总结|summarize|summary|概览|overview|介绍").expect("valid summary regex")
});

static CODE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"改|修改|重构|修复|实现|新增|删除|代码|diff|patch|fix|refactor|implement|bug")
        .expect("valid code regex")
});

/// Kind of answer a task asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    Summary,
    Code,
    Chat,
}

impl TaskMode {
    /// Keyword-based mode for `task`; summary keywords win over code
    /// keywords, anything else is chat.
    pub fn infer_heuristic(task: &str) -> Self {
        let lowered = task.to_lowercase();
        if SUMMARY_KEYWORDS.is_match(&lowered) {
            TaskMode::Summary
        } else if CODE_KEYWORDS.is_match(&lowered) {
            TaskMode::Code
        } else {
            TaskMode::Chat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMode::Summary => "summary",
            TaskMode::Code => "code",
            TaskMode::Chat => "chat",
        }
    }
}

impl fmt::Display for TaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "summary" => Ok(TaskMode::Summary),
            "code" => Ok(TaskMode::Code),
            "chat" => Ok(TaskMode::Chat),
            other => Err(format!("unknown task mode '{other}'")),
        }
    }
}

/// Build the routed query list: the task first, then the rewrites.
///
/// Only the first six non-empty trimmed entries are considered; they
/// are de-duplicated and capped at four.
pub fn sanitize_queries(task: &str, rewritten: &[String]) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();
    let window = std::iter::once(task)
        .chain(rewritten.iter().map(String::as_str))
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .take(QUERY_WINDOW);

    for query in window {
        if !queries.iter().any(|q| q == query) {
            queries.push(query.to_string());
        }
    }
    queries.truncate(MAX_ROUTED_QUERIES);
    queries
}

/// Result of asking a router about a task
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// The router classified the task and produced queries
    Routed {
        mode: TaskMode,
        queries: Vec<String>,
    },

    /// The router could not help; the caller decides what to do
    Fallback { reason: String },
}

/// Classifies a task and rewrites it into retrieval queries
#[async_trait]
pub trait QueryRouter: Send + Sync {
    async fn route(&self, task: &str) -> RouteOutcome;
}

/// Mode and queries to retrieve with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub mode: TaskMode,
    pub queries: Vec<String>,
    /// Whether a router produced this route
    pub routed: bool,
}

impl Route {
    /// Heuristic mode, with the task as the only query
    pub fn heuristic(task: &str) -> Self {
        Self {
            mode: TaskMode::infer_heuristic(task),
            queries: sanitize_queries(task, &[]),
            routed: false,
        }
    }
}

/// Ask `router` (if any) and fall back to the heuristic route.
pub async fn route_or_heuristic(router: Option<&dyn QueryRouter>, task: &str) -> Route {
    let Some(router) = router else {
        return Route::heuristic(task);
    };

    match router.route(task).await {
        RouteOutcome::Routed { mode, queries } => Route {
            mode,
            queries,
            routed: true,
        },
        RouteOutcome::Fallback { reason } => {
            tracing::warn!("Routing fell back to heuristic: {}", reason);
            Route::heuristic(task)
        }
    }
}
