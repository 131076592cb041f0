use anyhow::Result;
use async_trait::async_trait;

use crate::models::Article;

/// A news provider that answers a query with normalized articles, in provider order
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Short name used in logs and fetch reports
    fn name(&self) -> &str;

    async fn fetch(&self, query: &str) -> Result<Vec<Article>>;
}
