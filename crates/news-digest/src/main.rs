mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    providers, relevance::DEFAULT_THRESHOLD, Config, DigestSettings, DigestView, LengthBand,
    NewsDesk, Session, SourceSelection,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "news-digest")]
#[command(about = "Fetch relevant news for a topic and summarize articles on demand")]
struct Args {
    /// Topic to fetch right away (otherwise you will be prompted)
    #[arg(short, long)]
    topic: Option<String>,

    /// Minimum cosine similarity between topic and article (0-1)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// News providers to query: all (NewsAPI + Tavily) or newsapi
    #[arg(long, default_value_t = SourceSelection::All)]
    sources: SourceSelection,

    /// Summary length preset: detailed (60-180) or brief (30-100)
    #[arg(long, default_value = "detailed", value_parser = parse_length_preset)]
    summary_length: LengthBand,

    /// Override the preset's minimum summary length
    #[arg(long)]
    min_length: Option<u32>,

    /// Override the preset's maximum summary length
    #[arg(long)]
    max_length: Option<u32>,

    /// Print the results for --topic and exit instead of opening the menu
    #[arg(long, requires = "topic")]
    once: bool,
}

fn parse_length_preset(value: &str) -> Result<LengthBand, String> {
    LengthBand::preset(value)
        .ok_or_else(|| format!("Unknown summary length: {value}. Use 'detailed' or 'brief'"))
}

impl Args {
    fn settings(&self) -> DigestSettings {
        DigestSettings {
            threshold: self.threshold,
            sources: self.sources,
            length_band: LengthBand {
                min: self.min_length.unwrap_or(self.summary_length.min),
                max: self.max_length.unwrap_or(self.summary_length.max),
            },
            ..DigestSettings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,shared=info,news_digest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let settings = args.settings();
    settings.validate()?;

    let config = Config::from_env(settings.sources)?;
    let providers = providers::init(&config).context("Failed to load models")?;
    let desk = NewsDesk::from_config(&config, providers, settings)?;
    tracing::info!(sources = %desk.settings().sources, "News desk ready");

    let mut session = Session::new();

    if args.once {
        let topic = args.topic.as_deref().unwrap_or_default();
        let report = ui::with_spinner(
            "🔄 Fetching news from multiple sources...",
            desk.fetch(&mut session, topic),
        )
        .await?;
        println!("{}\n", DigestView::fetch_outcome(&report));
        print!("{}", DigestView::session(&session));
        return Ok(());
    }

    println!("📰 News Digest");
    println!("Get accurate and relevant news from multiple sources, summarized instantly.\n");

    ui::run(&desk, &mut session, args.topic).await
}
