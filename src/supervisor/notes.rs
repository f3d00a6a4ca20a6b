//! Aggregation of research notes from the supervisor's conversation.

use crate::supervisor::CONDUCT_RESEARCH;
use crate::types::Turn;
use std::collections::HashSet;

/// Extract the compressed research summaries from a supervisor conversation.
///
/// Returns, in turn order, the content of every tool-result turn whose
/// originating invocation was a delegation. Reflection results stay visible
/// to the supervisor's own decision-making but are excluded from the final
/// notes. Pure: the input is not mutated and repeated calls on the same
/// conversation yield identical output.
pub fn collect_delegation_notes(conversation: &[Turn]) -> Vec<String> {
    let delegation_ids: HashSet<&str> = conversation
        .iter()
        .flat_map(|turn| turn.invocations())
        .filter(|call| call.name == CONDUCT_RESEARCH)
        .map(|call| call.id.as_str())
        .collect();

    conversation
        .iter()
        .filter_map(|turn| match turn {
            Turn::ToolResult {
                invocation_id,
                content,
                ..
            } if delegation_ids.contains(invocation_id.as_str()) => Some(content.clone()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::THINK_TOOL;
    use crate::types::ToolCall;
    use serde_json::json;

    fn delegation_round(topics: &[(&str, &str)]) -> Vec<Turn> {
        // One assistant turn delegating every topic, followed by the
        // correlated tool results in invocation order.
        let calls: Vec<ToolCall> = topics
            .iter()
            .map(|(id, topic)| ToolCall {
                id: id.to_string(),
                name: CONDUCT_RESEARCH.to_string(),
                arguments: json!({"research_topic": topic}),
            })
            .collect();

        let mut conversation = vec![Turn::Assistant {
            content: String::new(),
            invocations: calls,
        }];
        for (id, topic) in topics {
            conversation.push(Turn::tool_result(
                *id,
                CONDUCT_RESEARCH,
                format!("summary of {}", topic),
            ));
        }
        conversation
    }

    #[test]
    fn test_notes_follow_delegation_order() {
        let mut conversation = vec![Turn::human("brief")];
        conversation.extend(delegation_round(&[("c1", "alpha"), ("c2", "beta")]));
        conversation.extend(delegation_round(&[("c3", "gamma")]));

        let notes = collect_delegation_notes(&conversation);
        assert_eq!(
            notes,
            vec![
                "summary of alpha".to_string(),
                "summary of beta".to_string(),
                "summary of gamma".to_string(),
            ]
        );
    }

    #[test]
    fn test_reflection_results_are_excluded() {
        let think = ToolCall {
            id: "t1".to_string(),
            name: THINK_TOOL.to_string(),
            arguments: json!({"reflection": "plan"}),
        };
        let delegate = ToolCall {
            id: "c1".to_string(),
            name: CONDUCT_RESEARCH.to_string(),
            arguments: json!({"research_topic": "alpha"}),
        };
        let conversation = vec![
            Turn::human("brief"),
            Turn::Assistant {
                content: String::new(),
                invocations: vec![think, delegate],
            },
            Turn::tool_result("t1", THINK_TOOL, "Reflection recorded: plan"),
            Turn::tool_result("c1", CONDUCT_RESEARCH, "summary of alpha"),
        ];

        let notes = collect_delegation_notes(&conversation);
        assert_eq!(notes, vec!["summary of alpha".to_string()]);
    }

    #[test]
    fn test_note_count_bounded_by_delegations_issued() {
        let mut conversation = vec![Turn::human("brief")];
        conversation.extend(delegation_round(&[("c1", "alpha"), ("c2", "beta")]));
        // A stray tool result with no originating delegation is ignored.
        conversation.push(Turn::tool_result("zz", CONDUCT_RESEARCH, "orphan"));

        let notes = collect_delegation_notes(&conversation);
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut conversation = vec![Turn::human("brief")];
        conversation.extend(delegation_round(&[("c1", "alpha")]));

        let first = collect_delegation_notes(&conversation);
        let second = collect_delegation_notes(&conversation);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_conversation_yields_no_notes() {
        assert!(collect_delegation_notes(&[]).is_empty());
    }
}
