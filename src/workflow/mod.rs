//! Outer workflow: clarify -> brief -> supervise -> report.
//!
//! A thin four-stage pipeline around the supervisor loop. The clarify and
//! brief stages are single structured-output calls; the report stage is a
//! single synthesis call. The only branching is that clarification may end
//! the run early with a question for the user.

use crate::llm::{StructuredModel, SynthesisModel};
use crate::prompts;
use crate::supervisor::Supervisor;
use crate::types::{AppError, Result, Turn};
use crate::utils::get_today_str;
use serde::Deserialize;

/// Structured output of the clarification stage.
#[derive(Debug, Clone, Deserialize)]
pub struct ClarifyDecision {
    /// Whether the user needs to clarify the request before research starts.
    pub need_clarification: bool,
    /// Question to ask the user when clarification is needed.
    #[serde(default)]
    pub question: String,
    /// Acknowledgement that research will start, when no clarification is
    /// needed.
    #[serde(default)]
    pub verification: String,
}

/// Structured output of the brief-writing stage.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchBrief {
    /// The research question that guides the whole run. Immutable once
    /// produced; forwarded verbatim to the supervisor.
    pub research_brief: String,
}

/// Outcome of a deep research run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The clarify stage decided the request is underspecified; the run
    /// ended early with this question for the user.
    NeedsClarification {
        /// Question to put back to the user.
        question: String,
    },
    /// Research ran to completion.
    Completed {
        /// The final report text.
        final_report: String,
        /// The research brief that guided the run.
        research_brief: String,
        /// Compressed research notes the report was written from.
        notes: Vec<String>,
    },
}

/// The four-stage deep research pipeline.
pub struct DeepResearch {
    structured: std::sync::Arc<dyn StructuredModel>,
    report_writer: std::sync::Arc<dyn SynthesisModel>,
    supervisor: Supervisor,
}

impl DeepResearch {
    /// Assemble a pipeline from explicit collaborator handles.
    pub fn new(
        structured: std::sync::Arc<dyn StructuredModel>,
        report_writer: std::sync::Arc<dyn SynthesisModel>,
        supervisor: Supervisor,
    ) -> Self {
        Self {
            structured,
            report_writer,
            supervisor,
        }
    }

    /// Wire a production pipeline from configuration: one OpenAI handle per
    /// logical role, a Tavily-backed search provider, and the configured
    /// loop ceilings.
    pub fn from_config(config: &crate::utils::config::ScoutConfig) -> Self {
        use crate::llm::OpenAiModel;
        use crate::researcher::ResearchUnit;
        use crate::tools::search::TavilyClient;
        use crate::tools::ResearcherToolkit;
        use std::sync::Arc;

        let models = &config.models;
        let decision = Arc::new(OpenAiModel::new(
            models.api_key.clone(),
            models.api_base.clone(),
            models.decision.clone(),
        ));
        let synthesis = Arc::new(OpenAiModel::new(
            models.api_key.clone(),
            models.api_base.clone(),
            models.synthesis.clone(),
        ));
        let report_writer = Arc::new(OpenAiModel::new(
            models.api_key.clone(),
            models.api_base.clone(),
            models.report.clone(),
        ));

        let toolkit = Arc::new(ResearcherToolkit::new(
            Arc::new(TavilyClient::new(config.search.api_key.clone())),
            config.search.max_results,
        ));
        let unit = Arc::new(ResearchUnit::new(
            decision.clone(),
            synthesis,
            toolkit,
            config.limits.max_researcher_steps,
        ));
        let supervisor = Supervisor::new(
            decision.clone(),
            unit,
            config.limits.max_supervisor_iterations,
            config.limits.max_concurrent_units,
        );

        Self::new(decision, report_writer, supervisor)
    }

    /// Run the pipeline over the conversation so far and return either a
    /// clarifying question or the final report.
    ///
    /// A run that fails mid-research still surfaces the notes aggregated
    /// before the failure through the error path of the supervisor, never a
    /// total loss of the brief.
    pub async fn run(&self, messages: &[Turn]) -> Result<RunOutcome> {
        let today = get_today_str();
        let buffer = render_conversation(messages);

        // Stage 1: clarify. May end the whole run early.
        let raw = self
            .structured
            .generate_structured(&prompts::clarify_instructions(&buffer, &today))
            .await?;
        let clarify: ClarifyDecision = serde_json::from_value(raw)
            .map_err(|e| AppError::Schema(format!("clarify response: {}", e)))?;

        if clarify.need_clarification {
            tracing::info!("run ended early: clarification needed");
            return Ok(RunOutcome::NeedsClarification {
                question: clarify.question,
            });
        }

        // Stage 2: write the research brief.
        let raw = self
            .structured
            .generate_structured(&prompts::brief_instructions(&buffer, &today))
            .await?;
        let brief: ResearchBrief = serde_json::from_value(raw)
            .map_err(|e| AppError::Schema(format!("brief response: {}", e)))?;

        tracing::info!("research brief written, starting supervision");

        // Stage 3: supervise the research.
        let report = self.supervisor.run(&brief.research_brief).await?;

        // Stage 4: write the final report from the aggregated notes.
        let findings = report.notes.join("\n");
        let prompt =
            prompts::final_report_instructions(&brief.research_brief, &findings, &today);
        let final_report = self
            .report_writer
            .synthesize("", &[Turn::human(prompt)])
            .await?;

        Ok(RunOutcome::Completed {
            final_report,
            research_brief: brief.research_brief,
            notes: report.notes,
        })
    }
}

/// Render a conversation into the buffer string interpolated into the
/// clarify and brief prompts.
pub fn render_conversation(messages: &[Turn]) -> String {
    messages
        .iter()
        .map(|turn| match turn {
            Turn::System { content } => format!("System: {}", content),
            Turn::Human { content } => format!("Human: {}", content),
            Turn::Assistant { content, .. } => format!("AI: {}", content),
            Turn::ToolResult { name, content, .. } => format!("Tool ({}): {}", name, content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
