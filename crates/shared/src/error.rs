use thiserror::Error;

/// Failures a user can act on. Provider plumbing errors ride along in `Provider`.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Please enter a topic first")]
    EmptyQuery,

    #[error("No article #{index}; the current results hold {count}")]
    NoSuchArticle { index: usize, count: usize },

    #[error(
        "{0} not found.\n\n\
        Set it as an environment variable or add it to ~/.config/news-digest/.env"
    )]
    MissingCredential(&'static str),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
