//! Integration tests for the supervisor loop through the public API:
//! multi-round delegation, deterministic recombination of concurrent unit
//! results, and termination behavior.

use async_trait::async_trait;
use scout::tools::search::{SearchProvider, SearchResult, SearchTopic};
use scout::{
    Decision, DecisionModel, ResearchUnit, ResearcherToolkit, Result, Supervisor, SynthesisModel,
    ToolCall, ToolDefinition, Turn,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ScriptedDecisions {
    script: Mutex<VecDeque<Decision>>,
}

impl ScriptedDecisions {
    fn new(script: Vec<Decision>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl DecisionModel for ScriptedDecisions {
    async fn decide(
        &self,
        _system: &str,
        _conversation: &[Turn],
        _tools: &[ToolDefinition],
    ) -> Result<Decision> {
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Decision::text("done")))
    }
}

/// Unit-side decision model that answers with text immediately, sleeping
/// first so that completion order differs from invocation order.
struct SlowFirstTopic;

#[async_trait]
impl DecisionModel for SlowFirstTopic {
    async fn decide(
        &self,
        _system: &str,
        conversation: &[Turn],
        _tools: &[ToolDefinition],
    ) -> Result<Decision> {
        let topic = conversation
            .first()
            .map(|t| t.content().to_string())
            .unwrap_or_default();
        if topic.contains("slow") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        Ok(Decision::text(format!("findings on {}", topic)))
    }
}

/// Synthesis model that names the topic it compressed.
struct TopicEcho;

#[async_trait]
impl SynthesisModel for TopicEcho {
    async fn synthesize(&self, _system: &str, conversation: &[Turn]) -> Result<String> {
        let topic = conversation
            .first()
            .map(|t| t.content().to_string())
            .unwrap_or_default();
        Ok(format!("compressed: {}", topic))
    }
}

struct NoSearch;

#[async_trait]
impl SearchProvider for NoSearch {
    async fn search(
        &self,
        _query: &str,
        _max_results: usize,
        _topic: SearchTopic,
    ) -> Result<Vec<SearchResult>> {
        Ok(Vec::new())
    }
}

fn delegate(topic: &str) -> ToolCall {
    ToolCall::new("conduct_research", json!({"research_topic": topic}))
}

fn build_supervisor(script: Vec<Decision>, max_iterations: usize) -> Supervisor {
    let toolkit = Arc::new(ResearcherToolkit::new(Arc::new(NoSearch), 3));
    let unit = Arc::new(ResearchUnit::new(
        Arc::new(SlowFirstTopic),
        Arc::new(TopicEcho),
        toolkit,
        6,
    ));
    Supervisor::new(
        Arc::new(ScriptedDecisions::new(script)),
        unit,
        max_iterations,
        3,
    )
}

#[tokio::test]
async fn test_concurrent_units_recombine_in_invocation_order() {
    // The first delegated topic finishes last; notes must still follow
    // invocation order, not completion order.
    let script = vec![
        Decision::invoke(vec![
            delegate("slow alpha"),
            delegate("beta"),
            delegate("gamma"),
        ]),
        Decision::invoke(vec![ToolCall::new("research_complete", json!({}))]),
    ];

    let report = build_supervisor(script, 6).run("brief").await.unwrap();
    assert_eq!(
        report.notes,
        vec![
            "compressed: slow alpha".to_string(),
            "compressed: beta".to_string(),
            "compressed: gamma".to_string(),
        ]
    );
    assert_eq!(report.raw_notes.len(), 3);
}

#[tokio::test]
async fn test_multi_round_supervision_accumulates_notes_across_rounds() {
    let script = vec![
        Decision::invoke(vec![delegate("round one topic")]),
        Decision::invoke(vec![delegate("round two topic")]),
        Decision::text("that covers the brief"),
    ];

    let report = build_supervisor(script, 6).run("brief").await.unwrap();
    assert_eq!(report.iterations, 3);
    assert_eq!(
        report.notes,
        vec![
            "compressed: round one topic".to_string(),
            "compressed: round two topic".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_completion_signal_stops_before_sibling_delegations_run() {
    // A round carrying both the completion signal and a delegation
    // terminates without executing the delegation.
    let script = vec![Decision::invoke(vec![
        ToolCall::new("research_complete", json!({})),
        delegate("never runs"),
    ])];

    let report = build_supervisor(script, 6).run("brief").await.unwrap();
    assert_eq!(report.iterations, 1);
    assert!(report.notes.is_empty());
    assert!(report.raw_notes.is_empty());
}

#[tokio::test]
async fn test_batch_failure_terminates_with_partial_notes() {
    // A unit task that panics fails the whole dispatch batch; supervision
    // stops there but keeps the notes from earlier rounds.
    struct PanicOnTopic;

    #[async_trait]
    impl DecisionModel for PanicOnTopic {
        async fn decide(
            &self,
            _system: &str,
            conversation: &[Turn],
            _tools: &[ToolDefinition],
        ) -> Result<Decision> {
            let topic = conversation
                .first()
                .map(|t| t.content().to_string())
                .unwrap_or_default();
            if topic.contains("unstable") {
                panic!("simulated crash");
            }
            Ok(Decision::text(format!("findings on {}", topic)))
        }
    }

    let script = vec![
        Decision::invoke(vec![delegate("alpha")]),
        Decision::invoke(vec![delegate("unstable beta")]),
        Decision::invoke(vec![delegate("never reached")]),
    ];
    let toolkit = Arc::new(ResearcherToolkit::new(Arc::new(NoSearch), 3));
    let unit = Arc::new(ResearchUnit::new(
        Arc::new(PanicOnTopic),
        Arc::new(TopicEcho),
        toolkit,
        6,
    ));
    let supervisor = Supervisor::new(Arc::new(ScriptedDecisions::new(script)), unit, 6, 3);

    let report = supervisor.run("brief").await.unwrap();
    assert_eq!(report.notes, vec!["compressed: alpha".to_string()]);
    assert_eq!(report.iterations, 2);
}

#[tokio::test]
async fn test_notes_bounded_by_iteration_budget() {
    // Delegating every round against a budget of 3 leaves at most two
    // executed rounds of delegations.
    let script = vec![
        Decision::invoke(vec![delegate("a")]),
        Decision::invoke(vec![delegate("b")]),
        Decision::invoke(vec![delegate("c")]),
        Decision::invoke(vec![delegate("d")]),
    ];

    let report = build_supervisor(script, 3).run("brief").await.unwrap();
    assert_eq!(report.iterations, 3);
    assert_eq!(report.notes.len(), 2);
}
