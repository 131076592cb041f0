use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::NewsApiSettings;
use crate::models::Article;
use crate::sources::NewsSource;

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
const NO_DESCRIPTION: &str = "No description";

/// Raw record from the `everything` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct NewsApiArticle {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<NewsApiArticle> for Article {
    fn from(raw: NewsApiArticle) -> Self {
        Article {
            title: raw.title,
            url: raw.url,
            content: raw
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

/// Keyword search against NewsAPI
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    settings: NewsApiSettings,
}

impl NewsApiClient {
    pub fn new(api_key: String, settings: NewsApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("news-digest/0.1")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            settings,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn search_url(&self, topic: &str) -> String {
        format!(
            "{}/everything?q={}&language={}&pageSize={}&sortBy={}&apiKey={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(topic),
            urlencoding::encode(&self.settings.language),
            self.settings.page_size,
            urlencoding::encode(&self.settings.sort_by),
            urlencoding::encode(&self.api_key)
        )
    }

    pub async fn search(&self, topic: &str) -> Result<Vec<NewsApiArticle>> {
        let response = self
            .client
            .get(self.search_url(topic))
            .send()
            .await
            .context("Failed to fetch articles from NewsAPI")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            anyhow::bail!("NewsAPI returned error: {} - {}", status, error_text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read NewsAPI response")?;

        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<Vec<NewsApiArticle>> {
    let parsed: NewsApiResponse =
        serde_json::from_str(body).context("Failed to parse NewsAPI response")?;
    Ok(parsed.articles)
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Article>> {
        let raw = self.search(query).await?;
        tracing::debug!(count = raw.len(), "NewsAPI returned articles");
        Ok(raw.into_iter().map(Article::from).collect())
    }
}
