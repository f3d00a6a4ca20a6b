//! Supervisor loop: owns the research budget, delegates topics to research
//! units, and aggregates their compressed findings.
//!
//! Each round the supervisor asks its decision model what to do next, then
//! either terminates or executes the round's invocations: reflections run
//! synchronously first, delegations are dispatched as a concurrent batch of
//! research units and awaited together. Unit results are recombined in the
//! invocation order of the originating round, never completion order, so
//! aggregation is deterministic. Termination triggers, in order: iteration
//! ceiling reached, a decision with no invocations, or an explicit
//! completion-signal invocation.

/// Note aggregation over the supervisor conversation.
pub mod notes;

use crate::llm::DecisionModel;
use crate::prompts;
use crate::researcher::{ResearchUnit, ResearchUnitResult};
use crate::tools::{think, THINK_TOOL};
use crate::types::{AppError, Result, ToolCall, ToolDefinition, Turn};
use crate::utils::get_today_str;
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;

pub use notes::collect_delegation_notes;

/// Action name for delegating one topic to a research unit.
pub const CONDUCT_RESEARCH: &str = "conduct_research";
/// Action name for the completion signal.
pub const RESEARCH_COMPLETE: &str = "research_complete";

/// Tool-result content substituted when a dispatched unit fails.
pub const RESEARCH_ERROR_MARKER: &str = "Error synthesizing research report";

/// The closed set of actions the supervisor's decision model may request.
#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorAction {
    /// Delegate one topic to a research unit.
    Delegate {
        /// Topic to investigate; by convention at least a paragraph of
        /// detail (not mechanically enforced).
        research_topic: String,
    },
    /// Signal that research is complete. Carries no arguments; its mere
    /// presence in a round stops the loop.
    Complete,
    /// Record a strategic reflection.
    Think {
        /// Free-text reflection.
        reflection: String,
    },
}

impl SupervisorAction {
    /// Parse a raw invocation into a typed action.
    pub fn parse(call: &ToolCall) -> Result<Self> {
        match call.name.as_str() {
            CONDUCT_RESEARCH => {
                let research_topic = call
                    .arguments
                    .get("research_topic")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        AppError::InvalidInput(
                            "conduct_research requires a 'research_topic' argument".to_string(),
                        )
                    })?
                    .to_string();
                Ok(SupervisorAction::Delegate { research_topic })
            }
            RESEARCH_COMPLETE => Ok(SupervisorAction::Complete),
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
                Ok(SupervisorAction::Think { reflection })
            }
            other => Err(AppError::InvalidInput(format!("Unknown tool: {}", other))),
        }
    }

    /// Schemas for the supervisor action vocabulary.
    pub fn definitions() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: CONDUCT_RESEARCH.to_string(),
                description: "Delegate a research task to a specialized research agent"
                    .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "research_topic": {
                            "type": "string",
                            "description": "The topic to research. Should be a single topic, described in high detail (at least a paragraph)."
                        }
                    },
                    "required": ["research_topic"]
                }),
            },
            ToolDefinition {
                name: RESEARCH_COMPLETE.to_string(),
                description: "Signal that the research process is complete".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {}
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

/// Everything a supervisor run produces.
#[derive(Debug, Clone)]
pub struct SupervisorReport {
    /// Compressed research notes, one per completed delegation, in
    /// delegation order. Consumed by the report stage.
    pub notes: Vec<String>,
    /// Raw evidence blocks accumulated from every unit, in delegation order.
    /// Not propagated to the report stage.
    pub raw_notes: Vec<String>,
    /// Number of decision rounds performed.
    pub iterations: usize,
}

/// The supervisor loop. Owns its run state exclusively; only the dispatched
/// batch of research units executes concurrently.
pub struct Supervisor {
    decision: Arc<dyn DecisionModel>,
    unit: Arc<ResearchUnit>,
    max_iterations: usize,
    max_concurrent_units: usize,
}

impl Supervisor {
    /// Create a supervisor with explicit handles and ceilings.
    ///
    /// `max_concurrent_units` is communicated to the decision model as
    /// advisory guidance; dispatch width is not capped mechanically.
    pub fn new(
        decision: Arc<dyn DecisionModel>,
        unit: Arc<ResearchUnit>,
        max_iterations: usize,
        max_concurrent_units: usize,
    ) -> Self {
        Self {
            decision,
            unit,
            max_iterations,
            max_concurrent_units,
        }
    }

    /// Run the research loop over a brief until a termination trigger fires,
    /// then aggregate and return the collected notes.
    pub async fn run(&self, brief: &str) -> Result<SupervisorReport> {
        let today = get_today_str();
        let instructions = prompts::supervisor_instructions(
            &today,
            self.max_concurrent_units,
            self.max_iterations,
        );
        let definitions = SupervisorAction::definitions();

        let mut conversation: Vec<Turn> = vec![Turn::human(brief)];
        let mut raw_notes: Vec<String> = Vec::new();
        let mut iterations = 0usize;

        if self.max_iterations == 0 {
            return Ok(SupervisorReport {
                notes: Vec::new(),
                raw_notes,
                iterations,
            });
        }

        loop {
            let decision = self
                .decision
                .decide(&instructions, &conversation, &definitions)
                .await?;
            let invocations = decision.invocations.clone();
            conversation.push(decision.into_turn());
            iterations += 1;

            // Termination triggers, evaluated in order; any one suffices.
            // Pending invocations from the terminal round never execute.
            let exceeded_iterations = iterations >= self.max_iterations;
            let no_invocations = invocations.is_empty();
            let research_complete = invocations
                .iter()
                .any(|call| call.name == RESEARCH_COMPLETE);

            if exceeded_iterations || no_invocations || research_complete {
                tracing::info!(
                    iterations,
                    exceeded_iterations,
                    research_complete,
                    "supervisor terminating"
                );
                break;
            }

            // Reflections resolve synchronously before the delegation batch
            // so the next decision sees both kinds of outcome together.
            let mut delegations: Vec<(ToolCall, String)> = Vec::new();
            for call in &invocations {
                match SupervisorAction::parse(call) {
                    Ok(SupervisorAction::Think { reflection }) => {
                        conversation.push(Turn::tool_result(
                            &call.id,
                            &call.name,
                            think::record_reflection(&reflection),
                        ));
                    }
                    Ok(SupervisorAction::Delegate { research_topic }) => {
                        delegations.push((call.clone(), research_topic));
                    }
                    // Completion was handled by the termination check above.
                    Ok(SupervisorAction::Complete) => {}
                    Err(e) => {
                        conversation.push(Turn::tool_result(
                            &call.id,
                            &call.name,
                            format!("Error: {}", e),
                        ));
                    }
                }
            }

            if delegations.is_empty() {
                continue;
            }

            tracing::info!(units = delegations.len(), iterations, "dispatching research units");

            match self.dispatch(&delegations).await {
                Ok(outcomes) => {
                    for ((call, topic), outcome) in delegations.iter().zip(outcomes) {
                        match outcome {
                            Some(Ok(result)) => {
                                conversation.push(Turn::tool_result(
                                    &call.id,
                                    &call.name,
                                    result.compressed_summary,
                                ));
                                raw_notes.extend(result.raw_notes);
                            }
                            Some(Err(e)) => {
                                tracing::warn!(topic = %topic, error = %e, "research unit failed");
                                conversation.push(Turn::tool_result(
                                    &call.id,
                                    &call.name,
                                    RESEARCH_ERROR_MARKER,
                                ));
                            }
                            None => {
                                conversation.push(Turn::tool_result(
                                    &call.id,
                                    &call.name,
                                    RESEARCH_ERROR_MARKER,
                                ));
                            }
                        }
                    }
                }
                Err(e) => {
                    // Batch-level failure is a stop condition: aggregate over
                    // whatever conversation exists so far.
                    tracing::error!(error = %e, "research unit batch failed, forcing termination");
                    break;
                }
            }
        }

        let notes = collect_delegation_notes(&conversation);
        Ok(SupervisorReport {
            notes,
            raw_notes,
            iterations,
        })
    }

    /// Dispatch one research unit per delegation, await them all, and return
    /// their outcomes indexed by invocation order.
    async fn dispatch(
        &self,
        delegations: &[(ToolCall, String)],
    ) -> Result<Vec<Option<Result<ResearchUnitResult>>>> {
        let mut set = JoinSet::new();
        for (index, (_, topic)) in delegations.iter().enumerate() {
            let unit = Arc::clone(&self.unit);
            let topic = topic.clone();
            set.spawn(async move {
                let outcome = unit.run(&topic, &topic).await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Result<ResearchUnitResult>>> =
            delegations.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => {
                    return Err(AppError::Dispatch(format!(
                        "research unit task failed: {}",
                        e
                    )));
                }
            }
        }
        Ok(outcomes)
    }
}
