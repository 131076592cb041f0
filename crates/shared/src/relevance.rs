//! Two-stage relevance filter.
//!
//! An article survives only if it shares at least one whole word with the query
//! (lexical gate) and its embedding is close enough to the query's (semantic
//! gate). The lexical gate runs first and short-circuits, so off-topic articles
//! never cost an embedding call.

use std::sync::Arc;

use anyhow::{Context, Result};
use regex::Regex;
use tokio::sync::OnceCell;

use crate::embedding::{cosine_similarity, Embedder};
use crate::models::Article;

pub const DEFAULT_THRESHOLD: f32 = 0.5;

pub struct RelevanceFilter {
    embedder: Arc<dyn Embedder>,
}

impl RelevanceFilter {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Compile the query once for a whole fetch cycle
    pub fn prepare(&self, query: &str) -> Result<QueryMatcher<'_>> {
        QueryMatcher::new(self.embedder.as_ref(), query)
    }

    /// One-off check of a single article
    pub async fn is_relevant(&self, article: &Article, query: &str, threshold: f32) -> Result<bool> {
        self.prepare(query)?.is_relevant(article, threshold).await
    }
}

/// A query ready to be matched against many articles.
///
/// The query embedding is computed on the first article that clears the
/// lexical gate and reused for every later one.
pub struct QueryMatcher<'a> {
    embedder: &'a dyn Embedder,
    query: String,
    words: Option<Regex>,
    query_embedding: OnceCell<Vec<f32>>,
}

impl<'a> QueryMatcher<'a> {
    fn new(embedder: &'a dyn Embedder, query: &str) -> Result<Self> {
        let tokens: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(regex::escape)
            .collect();

        let words = if tokens.is_empty() {
            None
        } else {
            let pattern = format!(r"\b(?:{})\b", tokens.join("|"));
            Some(Regex::new(&pattern).context("Failed to compile query pattern")?)
        };

        Ok(Self {
            embedder,
            query: query.to_string(),
            words,
            query_embedding: OnceCell::new(),
        })
    }

    /// True when any query token appears as a whole word in title or content
    pub fn lexical_match(&self, article: &Article) -> bool {
        match &self.words {
            Some(words) => words.is_match(&article.searchable_text().to_lowercase()),
            None => false,
        }
    }

    /// Cosine similarity between the query and the article text
    pub async fn semantic_score(&self, article: &Article) -> Result<f32> {
        let query_embedding = self
            .query_embedding
            .get_or_try_init(|| self.embedder.embed(&self.query))
            .await
            .context("Failed to embed query")?;

        let article_embedding = self
            .embedder
            .embed(&article.searchable_text())
            .await
            .context("Failed to embed article")?;

        Ok(cosine_similarity(query_embedding, &article_embedding))
    }

    pub async fn is_relevant(&self, article: &Article, threshold: f32) -> Result<bool> {
        if !self.lexical_match(article) {
            tracing::debug!(title = %article.title, "Rejected: no query word in article");
            return Ok(false);
        }

        let score = self.semantic_score(article).await?;
        let keep = score >= threshold;
        tracing::debug!(title = %article.title, score, threshold, keep, "Semantic gate");
        Ok(keep)
    }
}
