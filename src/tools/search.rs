//! Web search capability.
//!
//! Research units search through the [`SearchProvider`] abstraction;
//! [`TavilyClient`] is the production implementation. Results are
//! deduplicated by URL and rendered into one deterministic text block for
//! the unit's conversation.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Topic category hint accepted by the search capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchTopic {
    /// General-purpose search (default).
    #[default]
    General,
    /// News-focused search.
    News,
    /// Finance-focused search.
    Finance,
}

impl SearchTopic {
    /// Parse a topic hint, falling back to [`SearchTopic::General`] on
    /// unknown values.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "news" => SearchTopic::News,
            "finance" => SearchTopic::Finance,
            _ => SearchTopic::General,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchTopic::General => "general",
            SearchTopic::News => "news",
            SearchTopic::Finance => "finance",
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title.
    pub title: String,
    /// Page URL; deduplication key.
    pub url: String,
    /// Content snippet or extracted text.
    pub content: String,
}

/// Pluggable search backend.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute one query, returning up to `max_results` hits.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        topic: SearchTopic,
    ) -> Result<Vec<SearchResult>>;
}

/// Drop results whose URL was already seen, preserving order.
pub fn deduplicate_by_url(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = std::collections::HashSet::new();
    results
        .into_iter()
        .filter(|result| seen.insert(result.url.clone()))
        .collect()
}

/// Render deduplicated results into the observation text a research unit
/// appends to its conversation.
pub fn format_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No search results found for query '{}'.", query);
    }

    let mut output = format!("Search results for '{}':\n", query);
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "\n--- SOURCE {}: {} ---\nURL: {}\n\n{}\n",
            i + 1,
            result.title,
            result.url,
            result.content
        ));
    }
    output
}

// ============= Tavily backend =============

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    topic: &'a str,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

/// Search provider backed by the Tavily API.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
}

impl TavilyClient {
    /// Create a client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        topic: SearchTopic,
    ) -> Result<Vec<SearchResult>> {
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results,
            topic: topic.as_str(),
            include_raw_content: false,
        };

        let response = self
            .http
            .post(TAVILY_API_URL)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Tool(format!("Tavily request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Tool(format!(
                "Tavily returned status {}",
                response.status()
            )));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| AppError::Tool(format!("Tavily response malformed: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> SearchResult {
        SearchResult {
            title: format!("title for {}", url),
            url: url.to_string(),
            content: "content".to_string(),
        }
    }

    #[test]
    fn test_deduplicate_by_url_preserves_first_occurrence() {
        let results = vec![result("https://a"), result("https://b"), result("https://a")];
        let unique = deduplicate_by_url(results);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].url, "https://a");
        assert_eq!(unique[1].url, "https://b");
    }

    #[test]
    fn test_format_search_results_numbers_sources() {
        let formatted = format_search_results("rust", &[result("https://a"), result("https://b")]);
        assert!(formatted.contains("SOURCE 1"));
        assert!(formatted.contains("SOURCE 2"));
        assert!(formatted.contains("URL: https://a"));
    }

    #[test]
    fn test_format_search_results_empty() {
        let formatted = format_search_results("rust", &[]);
        assert!(formatted.contains("No search results found"));
        assert!(formatted.contains("rust"));
    }

    #[test]
    fn test_topic_parse_falls_back_to_general() {
        assert_eq!(SearchTopic::parse("news"), SearchTopic::News);
        assert_eq!(SearchTopic::parse("sports"), SearchTopic::General);
    }
}
