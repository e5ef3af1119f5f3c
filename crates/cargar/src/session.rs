//! Simulated user session lifecycle.
//!
//! One `Session` models one end-user: claim a login identity from the
//! shared pool, perform the two-step login handshake, issue randomized
//! actions while active, and log out on teardown. The driver decides when
//! a session terminates; the session itself guarantees that teardown
//! always completes and that no request is ever retried.

use crate::action::{ActionSelector, PlannedRequest};
use crate::assets;
use crate::client::MenuClient;
use crate::fixture::Credential;
use crate::pool::CredentialPool;
use tracing::{info, warn};

/// Lifecycle states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing issued yet
    NotStarted,
    /// Claiming a credential and performing the login handshake
    Authenticating,
    /// Issuing randomized actions
    Active,
    /// Tearing down (logout in flight)
    Terminating,
    /// Finished; no further requests
    Ended,
}

/// The identity a session presents to the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A claimed credential; the session attempts login and logs out on teardown
    Authenticated(Credential),
    /// Pool was exhausted; the session runs unauthenticated for its lifetime
    Anonymous,
}

impl Identity {
    /// Whether a credential was claimed for this session.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// One simulated user session.
#[derive(Debug)]
pub struct Session {
    client: MenuClient,
    selector: ActionSelector,
    fetch_static_assets: bool,
    identity: Identity,
    state: SessionState,
}

impl Session {
    /// Create a session over its own client (cookie jar included).
    #[must_use]
    pub fn new(client: MenuClient, selector: ActionSelector, fetch_static_assets: bool) -> Self {
        Self {
            client,
            selector,
            fetch_static_assets,
            identity: Identity::Anonymous,
            state: SessionState::NotStarted,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identity presented by this session.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Claim a credential and log in, then become active.
    ///
    /// With a claimed credential the handshake is: GET the login form,
    /// extract the anti-forgery token from the `csrftoken` cookie, POST
    /// the credentials with the token echoed as a header. The session
    /// becomes active regardless of the HTTP outcome; a response that
    /// lands back on the login page is logged as a failed authentication
    /// and nothing more. With no credential available the handshake is
    /// skipped entirely.
    pub async fn begin(&mut self, pool: &CredentialPool) {
        if self.state != SessionState::NotStarted {
            return;
        }
        self.state = SessionState::Authenticating;
        match pool.claim() {
            Some(credential) => {
                self.identity = Identity::Authenticated(credential.clone());
                self.login(&credential).await;
            }
            // Pool already warned; the session stays anonymous for good.
            None => {}
        }
        self.state = SessionState::Active;
    }

    async fn login(&self, credential: &Credential) {
        let csrf_token = match self.client.get("/login/", "/login/").await {
            Ok(response) => response.cookie("csrftoken").map(str::to_string),
            Err(_) => None,
        };

        let response = self
            .client
            .post_form(
                "/login/",
                "/login/",
                &[
                    ("username", credential.username.as_str()),
                    ("password", credential.password.as_str()),
                ],
                csrf_token.as_deref(),
            )
            .await;

        // Landing back on the login page is the only failure signal the
        // target gives us; a custom redirect rule would defeat it.
        match response {
            Ok(r) if r.final_url.contains("login") => {
                warn!(username = %credential.username, "login failed");
            }
            Ok(_) => {
                info!(username = %credential.username, "login successful");
            }
            Err(_) => {}
        }
    }

    /// Perform one randomized action. No-op outside the active state.
    pub async fn step(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        let plan = {
            let mut rng = rand::rng();
            self.selector.plan(&mut rng)
        };
        self.execute(plan).await;
    }

    async fn execute(&self, plan: PlannedRequest) {
        let result = if plan.ajax {
            self.client.get_ajax(&plan.path, plan.name).await
        } else {
            self.client.get(&plan.path, plan.name).await
        };

        match result {
            Ok(response) => {
                if self.fetch_static_assets && plan.action.discovers_assets() {
                    assets::discover_and_fetch(&self.client, &response.body).await;
                }
            }
            // Already recorded as a failed sample; never retried.
            Err(_) => {}
        }
    }

    /// Tear the session down. Issues a logout only if a credential was
    /// claimed; failures are logged and swallowed. Always reaches `Ended`.
    pub async fn end(&mut self) {
        if self.state == SessionState::Ended {
            return;
        }
        self.state = SessionState::Terminating;
        if let Identity::Authenticated(credential) = &self.identity {
            match self.client.get("/logout/", "/logout/").await {
                Ok(r) if r.is_success() => {
                    info!(username = %credential.username, "logged out");
                }
                Ok(r) => {
                    warn!(username = %credential.username, status = r.status, "logout rejected");
                }
                Err(e) => {
                    warn!(username = %credential.username, error = %e, "logout failed");
                }
            }
        }
        self.state = SessionState::Ended;
    }
}
