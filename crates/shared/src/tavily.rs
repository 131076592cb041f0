use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TavilySettings;
use crate::models::Article;
use crate::sources::NewsSource;

const SEARCH_ENDPOINT: &str = "https://api.tavily.com/search";

/// Tavily API request
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: u32,
}

/// Tavily API response
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

/// Individual search result from Tavily
#[derive(Debug, Clone, Deserialize)]
pub struct TavilyResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub raw_content: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub score: Option<f64>,
}

impl From<TavilyResult> for Article {
    fn from(raw: TavilyResult) -> Self {
        Article {
            title: raw.title,
            url: raw.url,
            content: raw.content.unwrap_or_default(),
        }
    }
}

/// AI-augmented web search through Tavily
pub struct TavilyClient {
    client: Client,
    api_key: String,
    settings: TavilySettings,
}

impl TavilyClient {
    pub fn new(api_key: String, settings: TavilySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn request<'a>(&'a self, query: &'a str) -> TavilyRequest<'a> {
        TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: &self.settings.search_depth,
            include_answer: true,
            include_raw_content: true,
            max_results: self.settings.max_results,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<TavilyResult>> {
        let response = self
            .client
            .post(SEARCH_ENDPOINT)
            .json(&self.request(query))
            .send()
            .await
            .context("Failed to send Tavily search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read Tavily response")?;

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<Vec<TavilyResult>> {
    let parsed: TavilyResponse =
        serde_json::from_str(body).context("Failed to parse Tavily response")?;
    Ok(parsed.results)
}

#[async_trait]
impl NewsSource for TavilyClient {
    fn name(&self) -> &str {
        "Tavily"
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Article>> {
        let raw = self.search(query).await?;
        tracing::debug!(count = raw.len(), "Tavily returned results");
        Ok(raw.into_iter().map(Article::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_asks_for_answer_and_raw_content() {
        let client = TavilyClient::new("tvly-key".to_string(), TavilySettings::default()).unwrap();
        let body = serde_json::to_value(client.request("electric cars")).unwrap();

        assert_eq!(
            body,
            json!({
                "api_key": "tvly-key",
                "query": "electric cars",
                "search_depth": "advanced",
                "include_answer": true,
                "include_raw_content": true,
                "max_results": 5
            })
        );
    }

    #[test]
    fn results_normalize_to_articles() {
        let body = json!({
            "query": "electric cars",
            "answer": "EV sales grew.",
            "results": [
                {
                    "title": "EV market report",
                    "url": "https://example.org/report",
                    "content": "Electric cars now make up a fifth of sales.",
                    "raw_content": "Long page text...",
                    "score": 0.92
                },
                {
                    "title": "Charging networks expand",
                    "url": "https://example.org/charging"
                }
            ]
        })
        .to_string();

        let articles: Vec<Article> = parse_response(&body)
            .unwrap()
            .into_iter()
            .map(Article::from)
            .collect();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "EV market report");
        assert_eq!(articles[0].content, "Electric cars now make up a fifth of sales.");
        assert_eq!(articles[1].content, "");
    }

    #[test]
    fn result_without_url_fails_to_parse() {
        let body = json!({"results": [{"title": "No link"}]}).to_string();
        assert!(parse_response(&body).is_err());
    }
}
