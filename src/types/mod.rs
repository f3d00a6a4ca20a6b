//! Core types shared across the orchestration engine: conversation turns,
//! action invocations, tool schemas, and the crate-wide error type.

use serde::{Deserialize, Serialize};

// ============= Conversation Types =============

/// One entry in a conversation.
///
/// Conversations are ordered and append-only within a loop's lifetime. An
/// assistant turn may carry zero or more [`ToolCall`] invocations; each
/// invocation is answered by exactly one [`Turn::ToolResult`] correlated by
/// invocation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    /// System instruction for the model.
    System {
        /// Instruction text.
        content: String,
    },
    /// Input originating from the user (or, for research units, the
    /// delegated topic).
    Human {
        /// Message text.
        content: String,
    },
    /// Model output, optionally requesting one or more tool invocations.
    Assistant {
        /// Free-text portion of the response.
        content: String,
        /// Action invocations requested by the model. Empty when the model
        /// answered with text only.
        invocations: Vec<ToolCall>,
    },
    /// Result of a single tool invocation.
    ToolResult {
        /// Id of the invocation this result answers.
        invocation_id: String,
        /// Name of the invoked tool.
        name: String,
        /// Result text (or an error marker when the tool failed).
        content: String,
    },
}

impl Turn {
    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        Turn::System {
            content: content.into(),
        }
    }

    /// Create a human turn.
    pub fn human(content: impl Into<String>) -> Self {
        Turn::Human {
            content: content.into(),
        }
    }

    /// Create an assistant turn without invocations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: content.into(),
            invocations: Vec::new(),
        }
    }

    /// Create a tool-result turn correlated to `invocation_id`.
    pub fn tool_result(
        invocation_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Turn::ToolResult {
            invocation_id: invocation_id.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// The textual content of this turn.
    pub fn content(&self) -> &str {
        match self {
            Turn::System { content }
            | Turn::Human { content }
            | Turn::Assistant { content, .. }
            | Turn::ToolResult { content, .. } => content,
        }
    }

    /// Action invocations carried by this turn (empty for non-assistant turns).
    pub fn invocations(&self) -> &[ToolCall] {
        match self {
            Turn::Assistant { invocations, .. } => invocations,
            _ => &[],
        }
    }
}

// ============= Tool Types =============

/// Schema describing a tool to the decision model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name as declared to the model.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON schema for the tool's argument record.
    pub parameters: serde_json::Value,
}

/// A named, argument-bearing action invocation emitted by the decision model
/// inside an assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Invocation id, unique within the sibling set of one assistant turn.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Argument record.
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Build a tool call with a fresh invocation id. Mostly useful in tests
    /// and scripted decision models.
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }
}

// ============= Error Types =============

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A decision or synthesis model call failed.
    #[error("Model error: {0}")]
    Model(String),

    /// A structured-output response did not match its declared schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A tool invocation failed. Inside the loops this is converted into an
    /// error-marker tool result rather than propagated.
    #[error("Tool error: {0}")]
    Tool(String),

    /// Awaiting a concurrently dispatched research-unit batch failed.
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed input, e.g. an action invocation with missing arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;
