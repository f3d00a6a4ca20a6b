//! Capabilities available to research units.
//!
//! The action vocabulary is a closed set: raw invocations coming back from
//! the decision model are parsed into [`ResearcherAction`] variants up front,
//! so an unknown action name or a missing argument is caught at decode time
//! rather than somewhere inside execution. There is no string-keyed runtime
//! lookup.

/// Web search capability and provider abstraction.
pub mod search;
/// Reflective note-taking capability.
pub mod think;

use crate::types::{AppError, Result, ToolCall, ToolDefinition};
use search::{SearchProvider, SearchTopic};
use serde_json::json;
use std::sync::Arc;

/// Action name for the web search capability.
pub const WEB_SEARCH: &str = "web_search";
/// Action name for the reflection capability.
pub const THINK_TOOL: &str = "think_tool";

/// The closed set of actions a research unit can execute.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearcherAction {
    /// Search the web for a single query.
    Search {
        /// The search query.
        query: String,
        /// Result-count hint; the toolkit default applies when absent.
        max_results: Option<usize>,
        /// Topic category hint.
        topic: SearchTopic,
    },
    /// Record a reflection for the model's own reasoning trace.
    Think {
        /// Free-text reflection.
        reflection: String,
    },
}

impl ResearcherAction {
    /// Parse a raw invocation into a typed action.
    pub fn parse(call: &ToolCall) -> Result<Self> {
        match call.name.as_str() {
            WEB_SEARCH => {
                let query = call
                    .arguments
                    .get("query")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        AppError::InvalidInput("web_search requires a 'query' argument".to_string())
                    })?
                    .to_string();
                let max_results = call
                    .arguments
                    .get("max_results")
                    .and_then(|v| v.as_u64())
                    .map(|n| n as usize);
                let topic = call
                    .arguments
                    .get("topic")
                    .and_then(|v| v.as_str())
                    .map(SearchTopic::parse)
                    .unwrap_or_default();
                Ok(ResearcherAction::Search {
                    query,
                    max_results,
                    topic,
                })
            }
            THINK_TOOL => {
                let reflection = call
                    .arguments
                    .get("reflection")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        AppError::InvalidInput(
                            "think_tool requires a 'reflection' argument".to_string(),
                        )
                    })?
                    .to_string();
                Ok(ResearcherAction::Think { reflection })
            }
            other => Err(AppError::InvalidInput(format!(
                "Unknown tool: {}",
                other
            ))),
        }
    }

    /// Schemas for the researcher action vocabulary, declared to the
    /// decision model on every call.
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: WEB_SEARCH.to_string(),
                description: "Search the web for information about a single query".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "A single search query to execute"
                        },
                        "max_results": {
                            "type": "integer",
                            "description": "Maximum number of results to return"
                        },
                        "topic": {
                            "type": "string",
                            "enum": ["general", "news", "finance"],
                            "description": "Topic category to filter results by"
                        }
                    },
                    "required": ["query"]
                }),
            },
            ToolDefinition {
                name: THINK_TOOL.to_string(),
                description: "Record a strategic reflection about research progress and gaps"
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "reflection": {
                            "type": "string",
                            "description": "Your reflection on progress, gaps, and next steps"
                        }
                    },
                    "required": ["reflection"]
                }),
            },
        ]
    }
}

/// Executable capabilities backing the researcher action set.
///
/// `execute` always returns text: failures are converted to an error string
/// at this boundary and never raised past it.
pub struct ResearcherToolkit {
    search: Arc<dyn SearchProvider>,
    default_max_results: usize,
}

impl ResearcherToolkit {
    /// Create a toolkit over the given search provider.
    pub fn new(search: Arc<dyn SearchProvider>, default_max_results: usize) -> Self {
        Self {
            search,
            default_max_results,
        }
    }

    /// Execute one action synchronously and return its observation text.
    pub async fn execute(&self, action: &ResearcherAction) -> String {
        match action {
            ResearcherAction::Search {
                query,
                max_results,
                topic,
            } => {
                let limit = max_results.unwrap_or(self.default_max_results);
                match self.search.search(query, limit, *topic).await {
                    Ok(results) => {
                        let unique = search::deduplicate_by_url(results);
                        tracing::debug!(query = %query, results = unique.len(), "search completed");
                        search::format_search_results(query, &unique)
                    }
                    Err(e) => {
                        tracing::warn!(query = %query, error = %e, "search failed");
                        format!("Error during web search for query '{}': {}", query, e)
                    }
                }
            }
            ResearcherAction::Think { reflection } => think::record_reflection(reflection),
        }
    }
}
