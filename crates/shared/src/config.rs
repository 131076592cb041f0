use std::env;

use crate::error::{DigestError, Result};
use crate::models::{LengthBand, SourceSelection};
use crate::relevance::DEFAULT_THRESHOLD;

pub const NEWSAPI_KEY: &str = "NEWSAPI_KEY";
pub const TAVILY_API_KEY: &str = "TAVILY_API_KEY";
pub const HF_API_TOKEN: &str = "HF_API_TOKEN";

/// Provider credentials read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub newsapi_key: String,
    pub tavily_api_key: Option<String>,
    pub hf_api_token: Option<String>,
}

impl Config {
    /// Load credentials for the given source selection.
    ///
    /// `NEWSAPI_KEY` is always required. `TAVILY_API_KEY` is required only when
    /// Tavily is selected. `HF_API_TOKEN` is optional.
    pub fn from_env(sources: SourceSelection) -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(sources, |key| env::var(key).ok())
    }

    /// Build a config from any key lookup; blank values count as missing.
    pub fn from_lookup<F>(sources: SourceSelection, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let newsapi_key = read(NEWSAPI_KEY).ok_or(DigestError::MissingCredential(NEWSAPI_KEY))?;

        let tavily_api_key = if sources.uses_tavily() {
            Some(read(TAVILY_API_KEY).ok_or(DigestError::MissingCredential(TAVILY_API_KEY))?)
        } else {
            None
        };

        Ok(Self {
            newsapi_key,
            tavily_api_key,
            hf_api_token: read(HF_API_TOKEN),
        })
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/news-digest/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("news-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

/// NewsAPI request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsApiSettings {
    pub language: String,
    pub page_size: u32,
    pub sort_by: String,
}

impl Default for NewsApiSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            page_size: 10,
            sort_by: "publishedAt".to_string(),
        }
    }
}

/// Tavily request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TavilySettings {
    pub search_depth: String,
    pub max_results: u32,
}

impl Default for TavilySettings {
    fn default() -> Self {
        Self {
            search_depth: "advanced".to_string(),
            max_results: 5,
        }
    }
}

/// Knobs that shape a digest session
#[derive(Debug, Clone, PartialEq)]
pub struct DigestSettings {
    pub threshold: f32,
    pub sources: SourceSelection,
    pub length_band: LengthBand,
    pub newsapi: NewsApiSettings,
    pub tavily: TavilySettings,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            sources: SourceSelection::default(),
            length_band: LengthBand::default(),
            newsapi: NewsApiSettings::default(),
            tavily: TavilySettings::default(),
        }
    }
}

impl DigestSettings {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(DigestError::InvalidSettings(format!(
                "threshold must be between 0 and 1, got {}",
                self.threshold
            )));
        }
        if self.length_band.min > self.length_band.max {
            return Err(DigestError::InvalidSettings(format!(
                "summary min length {} exceeds max length {}",
                self.length_band.min, self.length_band.max
            )));
        }
        if self.newsapi.page_size == 0 || self.tavily.max_results == 0 {
            return Err(DigestError::InvalidSettings(
                "result limits must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
