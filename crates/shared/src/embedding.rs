use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::inference::{with_retries, AttemptError, RetryPolicy, INFERENCE_BASE_URL};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Maps text to a fixed-length vector. Identical input must give an identical vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
}

/// Sentence models return one pooled vector; token-level models return one per token.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionResponse {
    Pooled(Vec<f32>),
    PerToken(Vec<Vec<f32>>),
}

impl FeatureExtractionResponse {
    fn into_vector(self) -> Result<Vec<f32>> {
        match self {
            FeatureExtractionResponse::Pooled(vector) => Ok(vector),
            FeatureExtractionResponse::PerToken(tokens) => mean_pool(&tokens),
        }
    }
}

fn mean_pool(tokens: &[Vec<f32>]) -> Result<Vec<f32>> {
    let width = tokens
        .first()
        .map(Vec::len)
        .ok_or_else(|| anyhow::anyhow!("No embedding returned"))?;

    let mut pooled = vec![0.0; width];
    for token in tokens {
        if token.len() != width {
            anyhow::bail!("Ragged token embeddings: {} vs {}", token.len(), width);
        }
        for (sum, value) in pooled.iter_mut().zip(token) {
            *sum += value;
        }
    }

    let count = tokens.len() as f32;
    pooled.iter_mut().for_each(|sum| *sum /= count);
    Ok(pooled)
}

/// Feature extraction through the Hugging Face inference API
pub struct HuggingFaceEmbedder {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
    retry: RetryPolicy,
}

impl HuggingFaceEmbedder {
    pub fn new(api_token: Option<String>) -> Result<Self> {
        Self::with_model(api_token, DEFAULT_EMBEDDING_MODEL)
    }

    pub fn with_model(api_token: Option<String>, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_token,
            endpoint: format!("{INFERENCE_BASE_URL}/{model}/pipeline/feature-extraction"),
            retry: RetryPolicy::default(),
        })
    }

    async fn try_embed(&self, text: &str) -> Result<Vec<f32>, AttemptError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&FeatureExtractionRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to send embedding request")
            .map_err(AttemptError::Fatal)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = anyhow::anyhow!("Embedding API error {}: {}", status, body);
            return Err(AttemptError::from_status(status, error));
        }

        let parsed: FeatureExtractionResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")
            .map_err(AttemptError::Fatal)?;

        parsed.into_vector().map_err(AttemptError::Fatal)
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        with_retries(self.retry, "Embedder", move || self.try_embed(text)).await
    }
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 when either vector is zero or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
