use crate::models::Article;
use crate::session::{FetchReport, Session};
use crate::summarizer::Summary;

const NO_CONTENT: &str = "No description available.";

pub struct DigestView;

impl DigestView {
    /// One-line outcome of a fetch
    pub fn fetch_outcome(report: &FetchReport) -> String {
        let sources = report
            .sources
            .iter()
            .map(|s| format!("{} {}", s.source, s.candidates))
            .collect::<Vec<_>>()
            .join(", ");

        if report.kept == 0 {
            format!(
                "No relevant articles among {} results ({}). Try another topic.",
                report.candidates(),
                sources
            )
        } else {
            format!(
                "✅ Found {} highly relevant articles (from {} results: {}).",
                report.kept,
                report.candidates(),
                sources
            )
        }
    }

    /// Numbered headline, as shown in the result list
    pub fn headline(index: usize, article: &Article) -> String {
        format!("{}. {}", index + 1, article.title)
    }

    pub fn headlines(session: &Session) -> Vec<String> {
        session
            .articles()
            .iter()
            .enumerate()
            .map(|(i, article)| Self::headline(i, article))
            .collect()
    }

    /// Expanded view of one article, including its summary if one was requested
    pub fn details(index: usize, article: &Article, summary: Option<&Summary>) -> String {
        let mut text = String::new();

        text.push_str(&Self::headline(index, article));
        text.push('\n');
        text.push_str(&format!("🔗 Read more: {}\n\n", article.url));

        if article.content.trim().is_empty() {
            text.push_str(NO_CONTENT);
        } else {
            text.push_str(article.content.trim());
        }
        text.push('\n');

        if let Some(summary) = summary {
            text.push('\n');
            text.push_str(&Self::summary(summary));
            text.push('\n');
        }

        text
    }

    pub fn summary(summary: &Summary) -> String {
        match summary {
            Summary::Success(text) => format!("🧾 Summary: {}", text),
            Summary::Failed { original, reason } => format!(
                "⚠ Could not summarize this article ({}). Showing the original text:\n{}",
                reason, original
            ),
        }
    }

    /// Whole session as plain text, for non-interactive runs
    pub fn session(session: &Session) -> String {
        let Some(query) = session.query() else {
            return "No news loaded yet. Enter a topic to fetch news.".to_string();
        };

        if session.is_empty() {
            return format!("No relevant articles for \"{}\".", query);
        }

        let mut text = format!("Results for \"{}\"\n\n", query);
        for (i, article) in session.articles().iter().enumerate() {
            text.push_str(&Self::details(i, article, session.summary(i)));
            text.push('\n');
        }
        text
    }
}
