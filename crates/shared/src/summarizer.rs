use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::inference::{with_retries, AttemptError, RetryPolicy, INFERENCE_BASE_URL};
use crate::models::LengthBand;

pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";
const MAX_INPUT_BYTES: usize = 10_000;

/// Outcome of summarizing one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Summary {
    Success(String),
    /// The provider failed; `original` is the text that was sent for summarization
    Failed { original: String, reason: String },
}

impl Summary {
    /// The text to show in place of the article body
    pub fn text(&self) -> &str {
        match self {
            Summary::Success(text) => text,
            Summary::Failed { original, .. } => original,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Summary::Success(_) => None,
            Summary::Failed { reason, .. } => Some(reason),
        }
    }
}

/// Maps text to a shorter text within a length band, deterministically
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, band: LengthBand) -> Result<String>;
}

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a str,
    parameters: SummarizationParameters,
}

#[derive(Serialize)]
struct SummarizationParameters {
    min_length: u32,
    max_length: u32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct SummarizationOutput {
    summary_text: String,
}

/// Abstractive summarization through the Hugging Face inference API
pub struct HuggingFaceSummarizer {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
    retry: RetryPolicy,
}

impl HuggingFaceSummarizer {
    pub fn new(api_token: Option<String>) -> Result<Self> {
        Self::with_model(api_token, DEFAULT_SUMMARY_MODEL)
    }

    pub fn with_model(api_token: Option<String>, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_token,
            endpoint: format!("{INFERENCE_BASE_URL}/{model}"),
            retry: RetryPolicy::default(),
        })
    }

    async fn try_summarize(&self, text: &str, band: LengthBand) -> Result<String, AttemptError> {
        let request = SummarizationRequest {
            inputs: truncate_at_char_boundary(text, MAX_INPUT_BYTES),
            parameters: SummarizationParameters {
                min_length: band.min,
                max_length: band.max,
                do_sample: false,
            },
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send summarization request")
            .map_err(AttemptError::Fatal)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            let error = anyhow::anyhow!("Summarization API error {}: {}", status, error_text);
            return Err(AttemptError::from_status(status, error));
        }

        let outputs = response
            .json::<Vec<SummarizationOutput>>()
            .await
            .context("Failed to parse summarization response")
            .map_err(AttemptError::Fatal)?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text.trim().to_string())
            .ok_or_else(|| AttemptError::Fatal(anyhow::anyhow!("Summarization returned no text")))
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str, band: LengthBand) -> Result<String> {
        with_retries(self.retry, "Summarizer", move || self.try_summarize(text, band)).await
    }
}

/// Cut `text` to at most `max_bytes`, respecting UTF-8 boundaries
pub fn truncate_at_char_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
