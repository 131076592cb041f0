// Public modules
pub mod config;
pub mod display;
pub mod embedding;
pub mod error;
pub mod inference;
pub mod models;
pub mod newsapi;
pub mod providers;
pub mod relevance;
pub mod session;
pub mod sources;
pub mod summarizer;
pub mod tavily;
pub mod testing;

// Re-export commonly used types
pub use config::{Config, DigestSettings};
pub use display::DigestView;
pub use embedding::{cosine_similarity, Embedder, HuggingFaceEmbedder};
pub use error::DigestError;
pub use models::{Article, LengthBand, SourceSelection};
pub use newsapi::NewsApiClient;
pub use providers::Providers;
pub use relevance::{QueryMatcher, RelevanceFilter};
pub use session::{FetchReport, NewsDesk, Session};
pub use sources::NewsSource;
pub use summarizer::{HuggingFaceSummarizer, Summarizer, Summary};
pub use tavily::TavilyClient;
