use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use shared::{DigestError, DigestView, NewsDesk, Session};

const PLACEHOLDER: &str = "e.g. electric cars, elections, AI...";

/// Show a spinner while `work` runs; the UI is blocked until it finishes
pub async fn with_spinner<F: Future>(message: &str, work: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = work.await;
    spinner.finish_and_clear();
    output
}

enum MainChoice {
    Article(usize),
    NewSearch,
    Quit,
}

/// Interactive loop: search, browse the numbered results, summarize on demand
pub async fn run(
    desk: &NewsDesk,
    session: &mut Session,
    initial_topic: Option<String>,
) -> Result<()> {
    let theme = ColorfulTheme::default();

    if let Some(topic) = initial_topic {
        fetch(desk, session, &topic).await;
    }

    loop {
        if session.query().is_none() {
            println!("{}", style("No news loaded yet. Enter a topic to fetch news.").cyan());
            let topic = prompt_topic(&theme)?;
            fetch(desk, session, &topic).await;
            continue;
        }

        match main_menu(&theme, session)? {
            MainChoice::Article(index) => browse_article(&theme, desk, session, index).await?,
            MainChoice::NewSearch => {
                let topic = prompt_topic(&theme)?;
                fetch(desk, session, &topic).await;
            }
            MainChoice::Quit => return Ok(()),
        }
    }
}

fn prompt_topic(theme: &ColorfulTheme) -> Result<String> {
    let topic = Input::<String>::with_theme(theme)
        .with_prompt(format!("🔍 Enter a topic ({PLACEHOLDER})"))
        .allow_empty(true)
        .interact_text()?;
    Ok(topic)
}

/// Fetch and report. Failures are shown but never end the session.
async fn fetch(desk: &NewsDesk, session: &mut Session, topic: &str) {
    let result = with_spinner(
        "🔄 Fetching news from multiple sources...",
        desk.fetch(session, topic),
    )
    .await;

    match result {
        Ok(report) => println!("{}", style(DigestView::fetch_outcome(&report)).green()),
        Err(DigestError::EmptyQuery) => {
            println!("{}", style("⚠️ Please enter a topic first.").yellow())
        }
        Err(e) => {
            tracing::error!("Fetch failed: {:#}", e);
            println!("{}", style(format!("✗ Could not fetch news: {}", e)).red());
        }
    }
}

fn main_menu(theme: &ColorfulTheme, session: &Session) -> Result<MainChoice> {
    let mut items = DigestView::headlines(session);
    let article_count = items.len();
    items.push("🔍 New search".to_string());
    items.push("Quit".to_string());

    let header = match session.query() {
        Some(query) if article_count > 0 => format!("Results for \"{}\"", query),
        Some(query) => format!("No relevant articles for \"{}\"", query),
        None => "News".to_string(),
    };

    let selection = Select::with_theme(theme)
        .with_prompt(header)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(match selection {
        i if i < article_count => MainChoice::Article(i),
        i if i == article_count => MainChoice::NewSearch,
        _ => MainChoice::Quit,
    })
}

async fn browse_article(
    theme: &ColorfulTheme,
    desk: &NewsDesk,
    session: &mut Session,
    index: usize,
) -> Result<()> {
    loop {
        let Some(article) = session.article(index) else {
            return Ok(());
        };
        println!("\n{}", DigestView::details(index, article, session.summary(index)));

        let items = [format!("Summarize article {}", index + 1), "Back".to_string()];
        let selection = Select::with_theme(theme)
            .items(&items)
            .default(0)
            .interact()?;
        if selection != 0 {
            return Ok(());
        }

        let summary = with_spinner("✍ Summarizing...", desk.summarize(session, index)).await?;
        if summary.warning().is_some() {
            println!(
                "{}",
                style("⚠ Summarization failed; showing the original text instead.").yellow()
            );
        }
    }
}
