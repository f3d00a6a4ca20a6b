//! # S.C.O.U.T. - Supervised Coordination Of aUtonomous research uniTs
//!
//! A two-level deep research orchestration engine. A supervisor loop decides
//! what to research next, delegates topics to bounded research units that run
//! concurrently, and aggregates their compressed findings deterministically.
//! A thin outer workflow (clarify -> brief -> supervise -> report) turns a
//! user conversation into a final report.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scout::{DeepResearch, RunOutcome, ScoutConfig, Turn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     scout::utils::init_tracing();
//!
//!     let mut config = ScoutConfig::default();
//!     config.resolve_env(); // OPENAI_API_KEY, TAVILY_API_KEY
//!
//!     let pipeline = DeepResearch::from_config(&config);
//!     let outcome = pipeline
//!         .run(&[Turn::human("Write a report on Rust async runtimes")])
//!         .await?;
//!
//!     match outcome {
//!         RunOutcome::NeedsClarification { question } => println!("{question}"),
//!         RunOutcome::Completed { final_report, .. } => println!("{final_report}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`supervisor`] - decision loop owning the research budget; dispatches
//!   research units as a concurrent batch and recombines their results in
//!   invocation order
//! - [`researcher`] - one bounded think/act/observe worker per delegated
//!   topic
//! - [`tools`] - the closed capability set research units may invoke (web
//!   search, reflection)
//! - [`llm`] - role-specific model contracts and the OpenAI implementation
//! - [`workflow`] - the four-stage outer pipeline
//!
//! Every handle (decision, synthesis, report, search) is an explicit
//! configuration object passed into constructors; there are no process-wide
//! singletons, and each role can be substituted independently in tests.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Role-specific model contracts and implementations.
pub mod llm;
/// Prompt templates for every model call.
pub mod prompts;
/// Research unit: bounded per-topic worker.
pub mod researcher;
/// Supervisor loop and note aggregation.
pub mod supervisor;
/// Capabilities available to research units.
pub mod tools;
/// Core types (turns, invocations, errors).
pub mod types;
/// Configuration and small shared utilities.
pub mod utils;
/// The four-stage outer pipeline.
pub mod workflow;

// Re-export commonly used types
pub use llm::{Decision, DecisionModel, OpenAiModel, StructuredModel, SynthesisModel};
pub use researcher::{ResearchUnit, ResearchUnitResult};
pub use supervisor::{collect_delegation_notes, Supervisor, SupervisorAction, SupervisorReport};
pub use tools::{ResearcherAction, ResearcherToolkit};
pub use types::{AppError, Result, ToolCall, ToolDefinition, Turn};
pub use utils::config::ScoutConfig;
pub use workflow::{ClarifyDecision, DeepResearch, ResearchBrief, RunOutcome};
