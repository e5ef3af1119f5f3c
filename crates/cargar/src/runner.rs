//! Concurrent session driver.
//!
//! Spawns one task per configured user, each owning a full session
//! lifecycle: begin (claim + login), randomized actions separated by
//! think-time until the shared deadline, then teardown. Teardown always
//! runs; the deadline is only checked between actions, so an in-flight
//! request is bounded by the client timeout rather than cancelled.

use crate::action::ActionSelector;
use crate::client::MenuClient;
use crate::config::RunConfig;
use crate::fixture::FixtureSet;
use crate::pool::CredentialPool;
use crate::result::{CargarError, CargarResult};
use crate::session::Session;
use crate::stats::{RunSummary, StatsRecorder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Drives many concurrent sessions against one target.
#[derive(Debug)]
pub struct LoadRunner {
    config: RunConfig,
}

impl LoadRunner {
    /// Create a runner for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is not runnable.
    pub fn new(config: RunConfig) -> CargarResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load fixtures from the configured data directory and run.
    pub async fn run(&self) -> CargarResult<RunSummary> {
        let fixtures = FixtureSet::load(&self.config.data_dir)?;
        self.run_with_fixtures(fixtures).await
    }

    /// Run against already-loaded fixtures.
    pub async fn run_with_fixtures(&self, fixtures: FixtureSet) -> CargarResult<RunSummary> {
        if fixtures.stream_ids.is_empty() {
            return Err(CargarError::fixture("stream_ids.csv has no rows"));
        }
        if fixtures.category_slugs.is_empty() {
            return Err(CargarError::fixture("category_slugs.csv has no rows"));
        }

        info!(
            host = %self.config.host,
            users = self.config.users,
            duration_secs = self.config.duration_secs,
            credentials = fixtures.credentials.len(),
            "starting load run"
        );

        let pool = Arc::new(CredentialPool::new(fixtures.credentials));
        let stream_ids = Arc::new(fixtures.stream_ids);
        let category_slugs = Arc::new(fixtures.category_slugs);
        let recorder = Arc::new(StatsRecorder::new());

        // Construct every session up front so client or weight errors
        // abort the run before any traffic is sent.
        let mut sessions = Vec::with_capacity(self.config.users as usize);
        for _ in 0..self.config.users {
            let client = MenuClient::new(
                &self.config.host,
                self.config.timeout(),
                Arc::clone(&recorder),
            )?;
            let selector = ActionSelector::new(
                &self.config.weights,
                Arc::clone(&stream_ids),
                Arc::clone(&category_slugs),
            )?;
            sessions.push(Session::new(
                client,
                selector,
                self.config.fetch_static_assets,
            ));
        }

        let started = Instant::now();
        let deadline = started + self.config.duration();
        let wait_bounds = (self.config.wait_min_secs, self.config.wait_max_secs);

        let mut handles = Vec::with_capacity(sessions.len());
        for mut session in sessions {
            let pool = Arc::clone(&pool);
            handles.push(tokio::spawn(async move {
                session.begin(&pool).await;
                while Instant::now() < deadline {
                    session.step().await;
                    tokio::time::sleep(think_time(wait_bounds.0, wait_bounds.1)).await;
                }
                session.end().await;
            }));
        }

        // A panicked worker forfeits its remaining actions; the run
        // itself carries on and reports what was recorded.
        let _ = futures::future::join_all(handles).await;

        let summary = recorder.summarize(started.elapsed(), self.config.users);
        info!(
            total = summary.total_requests,
            failed = summary.failed_requests,
            rps = summary.throughput_rps,
            "load run complete"
        );
        Ok(summary)
    }
}

/// Uniformly random think-time between the configured bounds.
fn think_time(min_secs: f64, max_secs: f64) -> Duration {
    use rand::Rng;
    let mut rng = rand::rng();
    Duration::from_secs_f64(rng.random_range(min_secs..=max_secs))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fixture::{CategorySlug, Credential, StreamId};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_target() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "csrftoken=tok; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/login/"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;
        server
    }

    fn fixtures(credentials: usize) -> FixtureSet {
        FixtureSet {
            credentials: (0..credentials)
                .map(|i| Credential::new(format!("user{i}"), "secret"))
                .collect(),
            stream_ids: vec![StreamId("s1".to_string()), StreamId("s2".to_string())],
            category_slugs: vec![CategorySlug("nature".to_string())],
        }
    }

    fn quick_config(host: &str, users: u32) -> RunConfig {
        RunConfig::new(host)
            .with_users(users)
            .with_duration(Duration::from_secs(1))
            .with_wait_time(0.0, 0.05)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RunConfig::default().with_users(0);
        assert!(LoadRunner::new(config).is_err());
    }

    #[tokio::test]
    async fn test_empty_stream_ids_fatal() {
        let server = mock_target().await;
        let runner = LoadRunner::new(quick_config(&server.uri(), 1)).unwrap();
        let mut fixtures = fixtures(1);
        fixtures.stream_ids.clear();
        let err = runner.run_with_fixtures(fixtures).await.unwrap_err();
        assert!(err.to_string().contains("stream_ids"));
    }

    #[tokio::test]
    async fn test_run_produces_summary() {
        let server = mock_target().await;
        let runner = LoadRunner::new(quick_config(&server.uri(), 2)).unwrap();
        let summary = runner.run_with_fixtures(fixtures(2)).await.unwrap();

        assert_eq!(summary.concurrency, 2);
        assert!(summary.total_requests > 0);
        assert!(!summary.endpoints.is_empty());
    }

    #[tokio::test]
    async fn test_one_more_session_than_credentials_degrades_exactly_one() {
        let server = mock_target().await;
        let runner = LoadRunner::new(quick_config(&server.uri(), 3)).unwrap();
        runner.run_with_fixtures(fixtures(2)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let logins = requests
            .iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/login/")
            .count();
        let logouts = requests
            .iter()
            .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/logout/")
            .count();
        // Two sessions claimed credentials; the third ran unauthenticated.
        assert_eq!(logins, 2);
        assert_eq!(logouts, 2);
    }

    #[tokio::test]
    async fn test_all_workers_log_out_on_deadline() {
        let server = mock_target().await;
        let runner = LoadRunner::new(quick_config(&server.uri(), 4)).unwrap();
        runner.run_with_fixtures(fixtures(4)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let logouts = requests
            .iter()
            .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/logout/")
            .count();
        assert_eq!(logouts, 4);
    }

    #[test]
    fn test_think_time_within_bounds() {
        for _ in 0..100 {
            let delay = think_time(0.5, 2.0);
            assert!(delay >= Duration::from_secs_f64(0.5));
            assert!(delay <= Duration::from_secs_f64(2.0));
        }
    }

    #[test]
    fn test_think_time_degenerate_bounds() {
        assert_eq!(think_time(0.0, 0.0), Duration::ZERO);
    }
}
