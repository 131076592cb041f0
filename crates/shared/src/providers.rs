use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::OnceCell;

use crate::config::Config;
use crate::embedding::{Embedder, HuggingFaceEmbedder};
use crate::summarizer::{HuggingFaceSummarizer, Summarizer};

/// Model clients shared by every session in the process
#[derive(Clone)]
pub struct Providers {
    pub embedder: Arc<dyn Embedder>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl Providers {
    pub fn new(embedder: Arc<dyn Embedder>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            embedder,
            summarizer,
        }
    }

    /// Hugging Face inference clients for the default models
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(HuggingFaceEmbedder::new(config.hf_api_token.clone())?),
            Arc::new(HuggingFaceSummarizer::new(config.hf_api_token.clone())?),
        ))
    }
}

static PROVIDERS: OnceCell<Providers> = OnceCell::new();

/// Install the process-wide providers. Call once at startup.
pub fn install(providers: Providers) -> Result<&'static Providers> {
    PROVIDERS
        .set(providers)
        .map_err(|_| anyhow::anyhow!("Model providers are already initialized"))?;
    global()
}

/// Build the default providers from `config` and install them
pub fn init(config: &Config) -> Result<&'static Providers> {
    install(Providers::from_config(config)?)
}

pub fn global() -> Result<&'static Providers> {
    PROVIDERS
        .get()
        .ok_or_else(|| anyhow::anyhow!("Model providers have not been initialized"))
}
