//! Profile sources served over HTTP.

mod common;

use pretty_assertions::assert_eq;
use scraper::Html;
use std::sync::Arc;

use common::fixtures::SAMPLE_PROFILE;
use common::{texts, MockHttpServer};
use folio::assets::AssetLoader;
use folio::error::LoadFailure;
use folio::models::AppConfig;
use folio::services::{source_for, HttpSource, PortfolioPipeline, ProfileSource};

#[tokio::test]
async fn test_http_source_fetches_body() {
    let mock = MockHttpServer::start().await;
    mock.mock_profile("/data.json", SAMPLE_PROFILE, 1).await;

    let source = HttpSource::new(mock.url_for("/data.json"));
    let body = source.fetch().await.unwrap();

    assert_eq!(body, SAMPLE_PROFILE);
    assert_eq!(source.describe(), mock.url_for("/data.json"));
}

#[tokio::test]
async fn test_http_error_status_is_a_load_failure() {
    let mock = MockHttpServer::start().await;
    mock.mock_error("/data.json", 404).await;

    let url = mock.url_for("/data.json");
    let error = HttpSource::new(url.clone()).fetch().await.unwrap_err();

    match error {
        LoadFailure::HttpStatus { url: failed, status } => {
            assert_eq!(failed, url);
            assert_eq!(status, 404);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_a_fetch_failure() {
    // Nothing listens on port 9 locally
    let error = HttpSource::new("http://127.0.0.1:9/data.json")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(error, LoadFailure::Fetch(_)));
}

#[tokio::test]
async fn test_pipeline_with_remote_profile() {
    let mock = MockHttpServer::start().await;
    mock.mock_profile("/profile.json", SAMPLE_PROFILE, 1).await;

    let config = AppConfig {
        data: mock.url_for("/profile.json"),
        ..AppConfig::default()
    };
    assert!(config.data_is_remote());

    let assets = Arc::new(AssetLoader::new(None, None));
    let pipeline = PortfolioPipeline::new(Arc::new(config), assets);
    let rendered = pipeline.run().await.unwrap();

    let html = Html::parse_document(&rendered.html());
    assert_eq!(texts(&html, ".hero-title"), vec!["Ana Horvat"]);
}

#[tokio::test]
async fn test_remote_failure_does_not_fire_signal() {
    let mock = MockHttpServer::start().await;
    mock.mock_error("/profile.json", 500).await;

    let config = AppConfig {
        data: mock.url_for("/profile.json"),
        ..AppConfig::default()
    };
    let assets = Arc::new(AssetLoader::new(None, None));
    let pipeline = PortfolioPipeline::new(Arc::new(config), assets);
    let mut rx = pipeline.signal().subscribe();

    assert!(matches!(
        pipeline.run().await,
        Err(LoadFailure::HttpStatus { status: 500, .. })
    ));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_source_for_uses_http_for_urls() {
    let mock = MockHttpServer::start().await;
    mock.mock_profile("/p.json", "{}", 1).await;

    let config = AppConfig {
        data: mock.url_for("/p.json"),
        ..AppConfig::default()
    };
    assert!(config.data_is_remote());

    let assets = Arc::new(AssetLoader::new(None, None));
    let source = source_for(&config, assets);
    assert_eq!(source.fetch().await.unwrap(), "{}");
}
