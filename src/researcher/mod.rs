//! Research unit: one bounded think/act/observe worker investigating a
//! single delegated topic.
//!
//! The loop is `DECIDE -> (ACT -> DECIDE)* -> SUMMARIZE`. Each decide call
//! sees the unit's own conversation only; each round's invocations execute
//! synchronously, in invocation order, before the next decision. The step
//! ceiling bounds the number of decision rounds, so the loop never blocks
//! indefinitely. Tool failures are surfaced as error-marker tool results and
//! the loop continues; decision or synthesis failures propagate and abort
//! the unit (the supervisor substitutes an error marker for the delegation).

use crate::llm::{DecisionModel, SynthesisModel};
use crate::prompts;
use crate::tools::{ResearcherAction, ResearcherToolkit};
use crate::types::{Result, Turn};
use crate::utils::get_today_str;
use std::sync::Arc;

/// The only data that survives a research unit's lifetime.
#[derive(Debug, Clone)]
pub struct ResearchUnitResult {
    /// Compressed summary of the unit's findings, handed to the supervisor.
    pub compressed_summary: String,
    /// Raw evidence blocks: the literal tool-result and assistant contents,
    /// joined into one block per unit run.
    pub raw_notes: Vec<String>,
}

/// A bounded research worker. Stateless between runs; each call to
/// [`ResearchUnit::run`] owns its conversation exclusively and shares nothing
/// with sibling units.
pub struct ResearchUnit {
    decision: Arc<dyn DecisionModel>,
    synthesis: Arc<dyn SynthesisModel>,
    toolkit: Arc<ResearcherToolkit>,
    max_steps: usize,
}

impl ResearchUnit {
    /// Create a unit with explicit model handles and a step ceiling.
    pub fn new(
        decision: Arc<dyn DecisionModel>,
        synthesis: Arc<dyn SynthesisModel>,
        toolkit: Arc<ResearcherToolkit>,
        max_steps: usize,
    ) -> Self {
        Self {
            decision,
            synthesis,
            toolkit,
            max_steps,
        }
    }

    /// Investigate one topic and return the compressed summary plus raw
    /// evidence.
    ///
    /// The brief seeds the conversation as its first human turn; the topic
    /// names the investigation for the compression step.
    pub async fn run(&self, topic: &str, brief: &str) -> Result<ResearchUnitResult> {
        let today = get_today_str();
        let instructions = prompts::researcher_instructions(&today);
        let definitions = ResearcherAction::definitions();

        let mut conversation: Vec<Turn> = vec![Turn::human(brief)];

        tracing::info!(topic = %topic, "research unit started");

        for step in 0..self.max_steps {
            let decision = self
                .decision
                .decide(&instructions, &conversation, &definitions)
                .await?;
            let invocations = decision.invocations.clone();
            conversation.push(decision.into_turn());

            if invocations.is_empty() {
                tracing::debug!(topic = %topic, step, "no invocations, moving to summarize");
                break;
            }

            // All invocations of this round run before the next decision,
            // in invocation order, each answered by one tool-result turn.
            for call in &invocations {
                let content = match ResearcherAction::parse(call) {
                    Ok(action) => self.toolkit.execute(&action).await,
                    Err(e) => format!("Error: {}", e),
                };
                conversation.push(Turn::tool_result(&call.id, &call.name, content));
            }
        }

        self.summarize(topic, conversation).await
    }

    /// Compress the conversation into a summary and collect raw evidence.
    async fn summarize(&self, topic: &str, conversation: Vec<Turn>) -> Result<ResearchUnitResult> {
        let raw_notes: Vec<String> = conversation
            .iter()
            .filter(|turn| matches!(turn, Turn::ToolResult { .. } | Turn::Assistant { .. }))
            .map(|turn| turn.content().to_string())
            .collect();

        let today = get_today_str();
        let mut compression_conversation = conversation;
        compression_conversation.push(Turn::human(prompts::compression_request(topic)));

        let compressed_summary = self
            .synthesis
            .synthesize(
                &prompts::compression_instructions(&today),
                &compression_conversation,
            )
            .await?;

        tracing::info!(topic = %topic, "research unit finished");

        Ok(ResearchUnitResult {
            compressed_summary,
            raw_notes: vec![raw_notes.join("\n")],
        })
    }
}
