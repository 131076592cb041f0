use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A news article normalized from any provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }

    /// Title and content joined the way both relevance gates see them
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }

    /// Text handed to the summarizer: the content, or the title when there is none
    pub fn summary_input(&self) -> &str {
        if self.content.is_empty() {
            &self.title
        } else {
            &self.content
        }
    }
}

/// Output length bounds for the summarizer, in the provider's own units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBand {
    pub min: u32,
    pub max: u32,
}

impl LengthBand {
    pub const DETAILED: LengthBand = LengthBand { min: 60, max: 180 };
    pub const BRIEF: LengthBand = LengthBand { min: 30, max: 100 };

    pub fn new(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Resolve a preset name (`detailed` or `brief`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "detailed" => Some(Self::DETAILED),
            "brief" => Some(Self::BRIEF),
            _ => None,
        }
    }
}

impl Default for LengthBand {
    fn default() -> Self {
        Self::DETAILED
    }
}

/// Which news providers a fetch consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceSelection {
    /// NewsAPI followed by Tavily
    #[default]
    All,
    NewsApiOnly,
}

impl SourceSelection {
    pub fn uses_tavily(&self) -> bool {
        matches!(self, SourceSelection::All)
    }
}

impl FromStr for SourceSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(SourceSelection::All),
            "newsapi" => Ok(SourceSelection::NewsApiOnly),
            other => Err(format!("Unknown source selection: {other}. Use 'all' or 'newsapi'")),
        }
    }
}

impl fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSelection::All => write!(f, "all"),
            SourceSelection::NewsApiOnly => write!(f, "newsapi"),
        }
    }
}
