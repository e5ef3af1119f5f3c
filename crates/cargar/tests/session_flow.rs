//! End-to-end session behavior against a mock MulticastMenu.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cargar::{
    ActionSelector, ActionWeights, CategorySlug, Credential, CredentialPool, FixtureSet,
    LoadRunner, MenuClient, RunConfig, Session, SessionState, StatsRecorder, StreamId,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_target() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "csrftoken=tok; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_body()))
        .mount(&server)
        .await;
    server
}

fn page_body() -> &'static str {
    r#"<html><head><script src="/static/app.js"></script></head>
    <body><img src="/static/logo.png"><img src="/other/banner.png"></body></html>"#
}

fn fixtures(credentials: usize) -> FixtureSet {
    FixtureSet {
        credentials: (0..credentials)
            .map(|i| Credential::new(format!("loaduser{i}"), "secret"))
            .collect(),
        stream_ids: vec![StreamId("s1".to_string()), StreamId("s2".to_string())],
        category_slugs: vec![CategorySlug("nature".to_string())],
    }
}

fn session_against(server: &MockServer, fetch_assets: bool) -> Session {
    let recorder = Arc::new(StatsRecorder::new());
    let client = MenuClient::new(server.uri(), Duration::from_secs(5), recorder).unwrap();
    let selector = ActionSelector::new(
        &ActionWeights::uniform(),
        Arc::new(fixtures(0).stream_ids),
        Arc::new(fixtures(0).category_slugs),
    )
    .unwrap();
    Session::new(client, selector, fetch_assets)
}

fn count(requests: &[wiremock::Request], http_method: &str, url_path: &str) -> usize {
    requests
        .iter()
        .filter(|r| r.method.as_str() == http_method && r.url.path() == url_path)
        .count()
}

#[tokio::test]
async fn credentialed_session_logs_in_once_and_out_once() {
    let server = mock_target().await;
    let pool = CredentialPool::new(vec![Credential::new("loaduser0", "secret")]);
    let mut session = session_against(&server, false);

    session.begin(&pool).await;
    for _ in 0..5 {
        session.step().await;
    }
    session.end().await;
    assert_eq!(session.state(), SessionState::Ended);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(count(&requests, "GET", "/login/"), 1);
    assert_eq!(count(&requests, "POST", "/login/"), 1);
    assert_eq!(count(&requests, "GET", "/logout/"), 1);
}

#[tokio::test]
async fn exhausted_pool_session_ends_without_logout() {
    let server = mock_target().await;
    let pool = CredentialPool::new(Vec::new());
    let mut session = session_against(&server, false);

    session.begin(&pool).await;
    session.step().await;
    session.end().await;
    assert_eq!(session.state(), SessionState::Ended);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(count(&requests, "GET", "/logout/"), 0);
    assert_eq!(count(&requests, "POST", "/login/"), 0);
}

#[tokio::test]
async fn asset_discovery_fetches_only_static_and_media_prefixes() {
    let server = mock_target().await;
    let pool = CredentialPool::new(Vec::new());
    let mut session = session_against(&server, true);

    session.begin(&pool).await;
    session.step().await;
    session.end().await;

    let requests = server.received_requests().await.unwrap();
    // Both /static/ resources are fetched; /other/ never is.
    let static_fetches = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/static/"))
        .count();
    let other_fetches = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/other/"))
        .count();
    // open/like steps skip discovery, so allow zero or a multiple of two.
    assert_eq!(static_fetches % 2, 0);
    assert_eq!(other_fetches, 0);
}

#[tokio::test]
async fn asset_discovery_disabled_by_default_fetches_nothing() {
    let server = mock_target().await;
    let pool = CredentialPool::new(Vec::new());
    let mut session = session_against(&server, false);

    session.begin(&pool).await;
    for _ in 0..5 {
        session.step().await;
    }
    session.end().await;

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().starts_with("/static/")));
}

#[tokio::test]
async fn detail_requests_only_use_fixture_stream_ids() {
    let server = mock_target().await;
    let runner = LoadRunner::new(
        RunConfig::new(server.uri())
            .with_users(2)
            .with_duration(Duration::from_secs(1))
            .with_wait_time(0.0, 0.01),
    )
    .unwrap();
    runner.run_with_fixtures(fixtures(2)).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    for request in &requests {
        let p = request.url.path();
        if let Some(id) = p
            .strip_prefix("/detail/")
            .and_then(|rest| rest.strip_suffix('/'))
        {
            let id = id
                .strip_prefix("open/")
                .or_else(|| id.strip_prefix("like_stream/"))
                .unwrap_or(id);
            assert!(id == "s1" || id == "s2", "unexpected stream id in {p}");
        }
    }
}

#[tokio::test]
async fn search_requests_use_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("query", "sintel"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let recorder = Arc::new(StatsRecorder::new());
    let client =
        MenuClient::new(server.uri(), Duration::from_secs(5), Arc::clone(&recorder)).unwrap();
    let response = client.get("/?query=sintel", "/?query=<query>").await.unwrap();
    assert!(response.is_success());

    // The literal term never reaches the metric name.
    assert_eq!(recorder.endpoint_names(), vec!["/?query=<query>"]);
}

#[tokio::test]
async fn run_summary_reports_normalized_endpoint_names() {
    let server = mock_target().await;
    let runner = LoadRunner::new(
        RunConfig::new(server.uri())
            .with_users(3)
            .with_duration(Duration::from_secs(1))
            .with_wait_time(0.0, 0.01),
    )
    .unwrap();
    let summary = runner.run_with_fixtures(fixtures(3)).await.unwrap();

    assert!(summary.total_requests > 0);
    for endpoint in &summary.endpoints {
        assert!(
            !endpoint.name.contains("s1")
                && !endpoint.name.contains("s2")
                && !endpoint.name.contains("nature"),
            "literal fixture value leaked into endpoint name {}",
            endpoint.name
        );
    }
    // The handshake shows up under its own names.
    assert!(summary.endpoints.iter().any(|e| e.name == "/login/"));
}
