use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use futures::future::try_join_all;

use crate::config::{Config, DigestSettings};
use crate::error::{DigestError, Result};
use crate::models::{Article, SourceSelection};
use crate::newsapi::NewsApiClient;
use crate::providers::Providers;
use crate::relevance::RelevanceFilter;
use crate::sources::NewsSource;
use crate::summarizer::{Summarizer, Summary};
use crate::tavily::TavilyClient;

/// One user's results, replaced wholesale by every fetch
#[derive(Debug, Default)]
pub struct Session {
    query: Option<String>,
    articles: Vec<Article>,
    summaries: HashMap<usize, Summary>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The query that produced the current results
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn article(&self, index: usize) -> Option<&Article> {
        self.articles.get(index)
    }

    pub fn summary(&self, index: usize) -> Option<&Summary> {
        self.summaries.get(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    fn replace(&mut self, query: String, articles: Vec<Article>) {
        self.query = Some(query);
        self.articles = articles;
        self.summaries.clear();
    }
}

/// Per-source candidate count for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub source: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub sources: Vec<SourceCount>,
    pub kept: usize,
}

impl FetchReport {
    pub fn candidates(&self) -> usize {
        self.sources.iter().map(|s| s.candidates).sum()
    }
}

/// Drives fetch → filter → summarize over a caller-owned `Session`
pub struct NewsDesk {
    sources: Vec<Arc<dyn NewsSource>>,
    filter: RelevanceFilter,
    summarizer: Arc<dyn Summarizer>,
    settings: DigestSettings,
}

impl NewsDesk {
    pub fn new(
        sources: Vec<Arc<dyn NewsSource>>,
        providers: &Providers,
        settings: DigestSettings,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            sources,
            filter: RelevanceFilter::new(providers.embedder.clone()),
            summarizer: providers.summarizer.clone(),
            settings,
        })
    }

    /// Wire up the real news providers selected in `settings`
    pub fn from_config(
        config: &Config,
        providers: &Providers,
        settings: DigestSettings,
    ) -> Result<Self> {
        let mut sources: Vec<Arc<dyn NewsSource>> = Vec::new();
        sources.push(Arc::new(NewsApiClient::new(
            config.newsapi_key.clone(),
            settings.newsapi.clone(),
        )?));

        if settings.sources == SourceSelection::All {
            let api_key = config
                .tavily_api_key
                .clone()
                .ok_or(DigestError::MissingCredential(crate::config::TAVILY_API_KEY))?;
            sources.push(Arc::new(TavilyClient::new(api_key, settings.tavily.clone())?));
        }

        Self::new(sources, providers, settings)
    }

    pub fn settings(&self) -> &DigestSettings {
        &self.settings
    }

    /// Every source's normalized articles, concatenated in source order
    pub async fn gather(&self, query: &str) -> Result<(Vec<Article>, Vec<SourceCount>)> {
        let fetches = self.sources.iter().map(|source| async move {
            source
                .fetch(query)
                .await
                .with_context(|| format!("Failed to fetch from {}", source.name()))
        });
        let batches = try_join_all(fetches).await?;

        let counts = self
            .sources
            .iter()
            .zip(&batches)
            .map(|(source, batch)| SourceCount {
                source: source.name().to_string(),
                candidates: batch.len(),
            })
            .collect();

        Ok((batches.into_iter().flatten().collect(), counts))
    }

    /// Fetch, filter and store results for `query`, replacing whatever the session held.
    ///
    /// A blank query is rejected before any network call. On error the session is untouched.
    pub async fn fetch(&self, session: &mut Session, query: &str) -> Result<FetchReport> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DigestError::EmptyQuery);
        }

        tracing::info!(query, sources = self.sources.len(), "Fetching news");
        let (candidates, counts) = self.gather(query).await?;

        let matcher = self.filter.prepare(query)?;
        let mut kept = Vec::new();
        for article in candidates {
            if matcher.is_relevant(&article, self.settings.threshold).await? {
                kept.push(article);
            }
        }

        let report = FetchReport {
            sources: counts,
            kept: kept.len(),
        };
        tracing::info!(
            candidates = report.candidates(),
            kept = report.kept,
            "Filtered news"
        );

        session.replace(query.to_string(), kept);
        Ok(report)
    }

    /// Summarize the article at `index`.
    ///
    /// Provider failures never escape: the outcome carries the original text instead.
    pub async fn summarize(&self, session: &mut Session, index: usize) -> Result<Summary> {
        let article = session
            .article(index)
            .ok_or(DigestError::NoSuchArticle {
                index: index + 1,
                count: session.articles.len(),
            })?;

        let input = article.summary_input().to_string();
        let summary = match self
            .summarizer
            .summarize(&input, self.settings.length_band)
            .await
        {
            Ok(text) => Summary::Success(text),
            Err(e) => {
                tracing::warn!(title = %article.title, "Summarization failed: {:#}", e);
                Summary::Failed {
                    original: input,
                    reason: format!("{:#}", e),
                }
            }
        };

        session.summaries.insert(index, summary.clone());
        Ok(summary)
    }
}
