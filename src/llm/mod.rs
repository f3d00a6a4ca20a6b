//! Model handles for the orchestration engine.
//!
//! The engine talks to language models through three narrow, role-specific
//! contracts instead of one catch-all client:
//!
//! - [`DecisionModel`] - free text plus typed action invocations, used by the
//!   supervisor and research-unit loops
//! - [`SynthesisModel`] - plain text over a conversation, used for finding
//!   compression and the final report
//! - [`StructuredModel`] - a JSON record matching a declared schema, used by
//!   the clarify and brief stages
//!
//! The split keeps the two response shapes (structured record vs. free text
//! with an action list) as distinct result types, and makes test substitution
//! per role trivial. [`OpenAiModel`] implements all three over the OpenAI
//! chat completions API.

/// Role-specific model traits and the decision result type.
pub mod client;
/// OpenAI-backed implementation of the model traits.
pub mod openai;

pub use client::{Decision, DecisionModel, StructuredModel, SynthesisModel};
pub use openai::OpenAiModel;
