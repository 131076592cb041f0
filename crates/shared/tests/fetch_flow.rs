use std::sync::Arc;
use std::time::Duration;

use shared::testing::{MockEmbedder, MockSource, MockSummarizer};
use shared::{
    Article, DigestError, DigestSettings, NewsDesk, NewsSource, Providers, RelevanceFilter,
    Session, Summary,
};

fn ev_article() -> Article {
    Article::new(
        "Electric cars surge in 2024",
        "https://example.com/ev",
        "Sales of electric vehicles rose sharply.",
    )
}

fn bakery_article() -> Article {
    Article::new(
        "Local bakery wins award",
        "https://example.com/bakery",
        "A small bakery received a national prize.",
    )
}

fn desk(
    sources: Vec<Arc<MockSource>>,
    embedder: Arc<MockEmbedder>,
    summarizer: Arc<MockSummarizer>,
    threshold: f32,
) -> NewsDesk {
    let sources = sources
        .into_iter()
        .map(|source| source as Arc<dyn NewsSource>)
        .collect();
    let settings = DigestSettings {
        threshold,
        ..DigestSettings::default()
    };
    NewsDesk::new(sources, &Providers::new(embedder, summarizer), settings).unwrap()
}

#[tokio::test]
async fn related_article_passes_both_gates() {
    let filter = RelevanceFilter::new(Arc::new(MockEmbedder::new()));
    assert!(filter
        .is_relevant(&ev_article(), "electric cars", 0.5)
        .await
        .unwrap());
}

#[tokio::test]
async fn unrelated_article_fails_for_every_threshold_without_embedding() {
    let embedder = Arc::new(MockEmbedder::new());
    let filter = RelevanceFilter::new(embedder.clone());

    for threshold in [-1.0, 0.0, 0.25, 0.5, 0.75, 1.0] {
        assert!(!filter
            .is_relevant(&bakery_article(), "electric cars", threshold)
            .await
            .unwrap());
    }
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn sources_merge_in_order_before_filtering() {
    let newsapi = Arc::new(MockSource::numbered("NewsAPI", 10, "cars"));
    let tavily = Arc::new(MockSource::numbered("Tavily", 5, "cars"));
    let desk = desk(
        vec![newsapi.clone(), tavily.clone()],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.0,
    );

    let (candidates, counts) = desk.gather("cars").await.unwrap();
    assert_eq!(candidates.len(), 15);
    assert_eq!(candidates[0].title, "NewsAPI story 1");
    assert_eq!(candidates[9].title, "NewsAPI story 10");
    assert_eq!(candidates[10].title, "Tavily story 1");
    assert_eq!(candidates[14].title, "Tavily story 5");
    assert_eq!(counts[0].candidates, 10);
    assert_eq!(counts[1].candidates, 5);

    let mut session = Session::new();
    let report = desk.fetch(&mut session, "cars").await.unwrap();
    assert_eq!(report.candidates(), 15);
    assert_eq!(report.kept, 15);
    let titles: Vec<&str> = session.articles().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, candidates.iter().map(|a| a.title.as_str()).collect::<Vec<_>>());
}

#[tokio::test]
async fn first_source_stays_first_when_it_answers_last() {
    let slow = Arc::new(
        MockSource::new(
            "NewsAPI",
            vec![Article::new("A cars", "https://a.example/1", "About cars")],
        )
        .with_delay(Duration::from_millis(200)),
    );
    let fast = Arc::new(MockSource::new(
        "Tavily",
        vec![Article::new("B cars", "https://b.example/1", "About cars")],
    ));
    let desk = desk(
        vec![slow.clone(), fast.clone()],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.0,
    );
    let mut session = Session::new();

    desk.fetch(&mut session, "cars").await.unwrap();

    let titles: Vec<&str> = session.articles().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["A cars", "B cars"]);
    assert_eq!(slow.queries(), vec!["cars"]);
    assert_eq!(fast.queries(), vec!["cars"]);
}

#[tokio::test]
async fn filtering_keeps_relative_order() {
    let source = Arc::new(MockSource::new(
        "NewsAPI",
        vec![
            ev_article(),
            bakery_article(),
            Article::new("Cars", "https://example.com/cars", "Electric cars everywhere."),
        ],
    ));
    let desk = desk(
        vec![source],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.5,
    );
    let mut session = Session::new();

    let report = desk.fetch(&mut session, "electric cars").await.unwrap();
    assert_eq!(report.kept, 2);
    assert_eq!(session.articles()[0].url, "https://example.com/ev");
    assert_eq!(session.articles()[1].url, "https://example.com/cars");
}

#[tokio::test]
async fn lowering_threshold_never_drops_an_article() {
    let articles = vec![
        ev_article(),
        bakery_article(),
        Article::new("Cars", "https://example.com/c", "Electric bikes and more cars."),
        Article::new(
            "Weekly roundup",
            "https://example.com/r",
            "Cars, boats, planes, trains, news.",
        ),
    ];
    let filter = RelevanceFilter::new(Arc::new(MockEmbedder::new()));
    let matcher = filter.prepare("electric cars").unwrap();
    let thresholds = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

    for article in &articles {
        let mut decisions = Vec::new();
        for &t in &thresholds {
            decisions.push(matcher.is_relevant(article, t).await.unwrap());
        }
        for pair in decisions.windows(2) {
            // accepted at a higher threshold implies accepted at the lower one
            assert!(!pair[1] || pair[0], "{}: {:?}", article.title, decisions);
        }
    }
}

#[tokio::test]
async fn repeated_checks_agree() {
    let filter = RelevanceFilter::new(Arc::new(MockEmbedder::new()));
    for article in [ev_article(), bakery_article()] {
        let first = filter.is_relevant(&article, "electric cars", 0.5).await.unwrap();
        let second = filter.is_relevant(&article, "electric cars", 0.5).await.unwrap();
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn same_text_at_different_urls_gets_same_decision() {
    let original = ev_article();
    let mirror = Article::new(&original.title, "https://mirror.example/ev", &original.content);
    let unrelated = bakery_article();
    let unrelated_mirror = Article::new(
        &unrelated.title,
        "https://mirror.example/bakery",
        &unrelated.content,
    );
    let filter = RelevanceFilter::new(Arc::new(MockEmbedder::new()));
    let matcher = filter.prepare("electric cars").unwrap();

    for threshold in [0.0, 0.5, 0.9] {
        assert_eq!(
            matcher.is_relevant(&original, threshold).await.unwrap(),
            matcher.is_relevant(&mirror, threshold).await.unwrap(),
        );
        assert_eq!(
            matcher.is_relevant(&unrelated, threshold).await.unwrap(),
            matcher.is_relevant(&unrelated_mirror, threshold).await.unwrap(),
        );
    }
    assert!(matcher.is_relevant(&mirror, 0.5).await.unwrap());
}

#[tokio::test]
async fn summarization_failure_falls_back_to_original_text() {
    let summarizer = Arc::new(MockSummarizer::new().failing_on(&ev_article().content));
    let source = Arc::new(MockSource::new("NewsAPI", vec![ev_article()]));
    let desk = desk(
        vec![source],
        Arc::new(MockEmbedder::new()),
        summarizer.clone(),
        0.5,
    );
    let mut session = Session::new();
    desk.fetch(&mut session, "electric cars").await.unwrap();
    let before = session.articles().to_vec();

    let summary = desk.summarize(&mut session, 0).await.unwrap();

    assert!(matches!(summary, Summary::Failed { .. }));
    assert_eq!(summary.text(), "Sales of electric vehicles rose sharply.");
    assert!(summary.warning().is_some());
    assert_eq!(session.articles(), before.as_slice());
    assert_eq!(session.summary(0), Some(&summary));
    assert_eq!(summarizer.calls().len(), 1);
}

#[tokio::test]
async fn summarizing_title_only_article_uses_title() {
    let summarizer = Arc::new(MockSummarizer::new());
    let source = Arc::new(MockSource::new(
        "Tavily",
        vec![Article::new("Electric cars rally", "https://example.com/t", "")],
    ));
    let desk = desk(vec![source], Arc::new(MockEmbedder::new()), summarizer.clone(), 0.0);
    let mut session = Session::new();
    desk.fetch(&mut session, "electric cars").await.unwrap();

    let summary = desk.summarize(&mut session, 0).await.unwrap();
    assert!(matches!(summary, Summary::Success(_)));
    assert_eq!(summarizer.calls()[0].text, "Electric cars rally");
}

#[tokio::test]
async fn failed_source_leaves_session_untouched() {
    let good = Arc::new(MockSource::numbered("NewsAPI", 2, "cars"));
    let desk_ok = desk(
        vec![good],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.0,
    );
    let mut session = Session::new();
    desk_ok.fetch(&mut session, "cars").await.unwrap();

    let broken = Arc::new(MockSource::numbered("Tavily", 2, "cars").failing());
    let desk_broken = desk(
        vec![Arc::new(MockSource::numbered("NewsAPI", 2, "cars")), broken],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.0,
    );
    let err = desk_broken.fetch(&mut session, "trucks").await.unwrap_err();

    assert!(matches!(err, DigestError::Provider(_)));
    assert!(err.to_string().contains("Tavily"));
    assert_eq!(session.query(), Some("cars"));
    assert_eq!(session.articles().len(), 2);
}

#[tokio::test]
async fn fetch_with_no_survivors_replaces_results() {
    let desk_ok = desk(
        vec![Arc::new(MockSource::numbered("NewsAPI", 3, "cars"))],
        Arc::new(MockEmbedder::new()),
        Arc::new(MockSummarizer::new()),
        0.0,
    );
    let mut session = Session::new();
    desk_ok.fetch(&mut session, "cars").await.unwrap();
    assert_eq!(session.articles().len(), 3);

    let report = desk_ok.fetch(&mut session, "bakery").await.unwrap();
    assert_eq!(report.kept, 0);
    assert!(session.is_empty());
    assert_eq!(session.query(), Some("bakery"));
}
