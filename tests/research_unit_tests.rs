//! Integration tests for the research unit loop through the public API:
//! search rounds, evidence collection order, and graceful degradation on
//! tool failure.

use async_trait::async_trait;
use scout::tools::search::{SearchProvider, SearchResult, SearchTopic};
use scout::{
    AppError, Decision, DecisionModel, ResearchUnit, ResearcherToolkit, Result, SynthesisModel,
    ToolCall, ToolDefinition, Turn,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

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
            .unwrap_or_else(|| Decision::text("I have enough information now.")))
    }
}

/// Synthesis model that reports how many turns it saw.
struct CountingSynthesis;

#[async_trait]
impl SynthesisModel for CountingSynthesis {
    async fn synthesize(&self, _system: &str, conversation: &[Turn]) -> Result<String> {
        Ok(format!("summary over {} turns", conversation.len()))
    }
}

/// Search provider that fails for queries containing "flaky".
struct SelectiveSearch;

#[async_trait]
impl SearchProvider for SelectiveSearch {
    async fn search(
        &self,
        query: &str,
        _max_results: usize,
        _topic: SearchTopic,
    ) -> Result<Vec<SearchResult>> {
        if query.contains("flaky") {
            return Err(AppError::Tool("upstream timeout".to_string()));
        }
        Ok(vec![
            SearchResult {
                title: "Primary source".to_string(),
                url: format!("https://example.com/{}", query.replace(' ', "-")),
                content: format!("evidence about {}", query),
            },
            SearchResult {
                title: "Duplicate source".to_string(),
                url: format!("https://example.com/{}", query.replace(' ', "-")),
                content: "same page again".to_string(),
            },
        ])
    }
}

fn build_unit(script: Vec<Decision>, max_steps: usize) -> ResearchUnit {
    let toolkit = Arc::new(ResearcherToolkit::new(Arc::new(SelectiveSearch), 3));
    ResearchUnit::new(
        Arc::new(ScriptedDecisions::new(script)),
        Arc::new(CountingSynthesis),
        toolkit,
        max_steps,
    )
}

fn search_call(query: &str) -> ToolCall {
    ToolCall::new("web_search", json!({"query": query}))
}

#[tokio::test]
async fn test_search_results_are_deduplicated_in_evidence() {
    let script = vec![Decision::invoke(vec![search_call("rust runtimes")])];
    let result = build_unit(script, 6)
        .run("rust runtimes", "rust runtimes")
        .await
        .unwrap();

    let evidence = &result.raw_notes[0];
    assert!(evidence.contains("SOURCE 1"));
    // The duplicate URL was dropped before formatting.
    assert!(!evidence.contains("SOURCE 2"));
    assert!(evidence.contains("evidence about rust runtimes"));
}

#[tokio::test]
async fn test_multi_round_evidence_preserves_round_order() {
    let script = vec![
        Decision::invoke(vec![search_call("first query")]),
        Decision::invoke(vec![
            ToolCall::new("think_tool", json!({"reflection": "narrow it down"})),
            search_call("second query"),
        ]),
    ];
    let result = build_unit(script, 6).run("topic", "topic").await.unwrap();

    let evidence = &result.raw_notes[0];
    let first = evidence.find("first query").expect("first round missing");
    let reflection = evidence
        .find("Reflection recorded: narrow it down")
        .expect("reflection missing");
    let second = evidence.find("second query").expect("second round missing");
    assert!(first < reflection && reflection < second);
}

#[tokio::test]
async fn test_failed_search_degrades_but_unit_still_summarizes() {
    let script = vec![
        Decision::invoke(vec![search_call("flaky sources")]),
        Decision::invoke(vec![search_call("stable sources")]),
    ];
    let result = build_unit(script, 6).run("topic", "topic").await.unwrap();

    let evidence = &result.raw_notes[0];
    assert!(evidence.contains("Error during web search for query 'flaky sources'"));
    assert!(evidence.contains("evidence about stable sources"));
    assert!(result.compressed_summary.starts_with("summary over"));
}

#[tokio::test]
async fn test_unit_returns_exactly_one_raw_notes_block() {
    let script = vec![
        Decision::invoke(vec![search_call("a")]),
        Decision::invoke(vec![search_call("b")]),
    ];
    let result = build_unit(script, 6).run("topic", "topic").await.unwrap();
    assert_eq!(result.raw_notes.len(), 1);
}
