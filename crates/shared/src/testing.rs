// Recording fakes for the provider traits.
//
// Each fake logs its calls so tests can assert on call counts and order.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::embedding::Embedder;
use crate::models::{Article, LengthBand};
use crate::sources::NewsSource;
use crate::summarizer::Summarizer;

// =============================================================================
// Mock Embedder
// =============================================================================

const MOCK_DIMENSIONS: usize = 512;

/// Bag-of-words embedder: every distinct lowercase word gets its own dimension.
pub struct MockEmbedder {
    vocabulary: Arc<Mutex<HashMap<String, usize>>>,
    fixed: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            vocabulary: Arc::new(Mutex::new(HashMap::new())),
            fixed: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every call returns an error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Return `vector` whenever exactly `text` is embedded
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.lock().unwrap().insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn bag_of_words(&self, text: &str) -> Vec<f32> {
        let mut vocabulary = self.vocabulary.lock().unwrap();
        let mut vector = vec![0.0; MOCK_DIMENSIONS];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let next = vocabulary.len();
            let slot = *vocabulary.entry(word.to_string()).or_insert(next);
            vector[slot % MOCK_DIMENSIONS] += 1.0;
        }
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());

        if self.fail {
            anyhow::bail!("mock embedder unavailable");
        }
        if let Some(vector) = self.fixed.lock().unwrap().get(text) {
            return Ok(vector.clone());
        }
        Ok(self.bag_of_words(text))
    }
}

// =============================================================================
// Mock Summarizer
// =============================================================================

/// Arguments captured from a summarize call
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeCall {
    pub text: String,
    pub band: LengthBand,
}

/// Returns the first `band.min` words of the input, or fails on demand
pub struct MockSummarizer {
    calls: Arc<Mutex<Vec<SummarizeCall>>>,
    fail_on: Arc<Mutex<Vec<String>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail whenever the input text equals `text`
    pub fn failing_on(self, text: &str) -> Self {
        self.fail_on.lock().unwrap().push(text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str, band: LengthBand) -> Result<String> {
        self.calls.lock().unwrap().push(SummarizeCall {
            text: text.to_string(),
            band,
        });

        if self.fail_on.lock().unwrap().iter().any(|t| t == text) {
            anyhow::bail!("mock summarizer failed");
        }

        let words: Vec<&str> = text.split_whitespace().take(band.min as usize).collect();
        Ok(words.join(" "))
    }
}

// =============================================================================
// Mock News Source
// =============================================================================

/// Serves a canned article list and counts queries
pub struct MockSource {
    name: String,
    articles: Vec<Article>,
    queries: Arc<Mutex<Vec<String>>>,
    delay: Duration,
    fail: bool,
}

impl MockSource {
    pub fn new(name: &str, articles: Vec<Article>) -> Self {
        Self {
            name: name.to_string(),
            articles,
            queries: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    /// `count` articles titled "<name> story N" that all mention `keyword`
    pub fn numbered(name: &str, count: usize, keyword: &str) -> Self {
        let articles = (1..=count)
            .map(|i| {
                Article::new(
                    format!("{name} story {i}"),
                    format!("https://{}.example/{i}", name.to_lowercase()),
                    format!("Report about {keyword}"),
                )
            })
            .collect();
        Self::new(name, articles)
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Wait `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl NewsSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Article>> {
        self.queries.lock().unwrap().push(query.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.fail {
            anyhow::bail!("{} is unreachable", self.name);
        }
        Ok(self.articles.clone())
    }
}
