//! Role-specific model contracts.
//!
//! Every call is independent; implementations hold no conversation state.
//! The loops own their conversations and pass them in full on each call.

use crate::types::{Result, ToolCall, ToolDefinition, Turn};
use async_trait::async_trait;

/// Outcome of one decision call: free text and zero or more requested action
/// invocations.
#[derive(Debug, Clone, Default)]
pub struct Decision {
    /// Free-text portion of the response.
    pub content: String,
    /// Action invocations requested by the model, in emission order.
    pub invocations: Vec<ToolCall>,
}

impl Decision {
    /// A plain-text decision with no invocations.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            invocations: Vec::new(),
        }
    }

    /// A decision consisting only of action invocations.
    pub fn invoke(invocations: Vec<ToolCall>) -> Self {
        Self {
            content: String::new(),
            invocations,
        }
    }

    /// Convert this decision into an assistant turn.
    pub fn into_turn(self) -> Turn {
        Turn::Assistant {
            content: self.content,
            invocations: self.invocations,
        }
    }
}

/// Decision-making contract: given a system instruction, a conversation and a
/// declared action vocabulary, return free text and/or action invocations.
#[async_trait]
pub trait DecisionModel: Send + Sync {
    /// Make one decision over the conversation.
    async fn decide(
        &self,
        system: &str,
        conversation: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Decision>;
}

/// Synthesis contract: produce one prose response over a conversation. Used
/// for compressing a research unit's findings and for the final report.
#[async_trait]
pub trait SynthesisModel: Send + Sync {
    /// Synthesize a single text over the conversation. `system` may be empty,
    /// in which case no system turn is sent.
    async fn synthesize(&self, system: &str, conversation: &[Turn]) -> Result<String>;
}

/// Structured-output contract: return a JSON record matching the schema the
/// system instruction declares. The caller deserializes into its own type.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    /// Produce a structured JSON record from the system instruction alone.
    async fn generate_structured(&self, system: &str) -> Result<serde_json::Value>;
}
