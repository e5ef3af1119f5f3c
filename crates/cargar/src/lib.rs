//! Cargar: authenticated-session load harness for MulticastMenu.
//!
//! Simulates many concurrent logged-in users against a MulticastMenu
//! deployment. Each session claims a credential from a shared pool,
//! performs the login handshake, then issues weighted-random page loads
//! (home, search, category filter, trending, editors' choice, liked,
//! stream detail/open/like) separated by human-like think-time, and logs
//! out on teardown. Request latencies aggregate per normalized endpoint
//! name.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   claim()   ┌────────────────┐   plan()   ┌────────────────┐
//! │ Credential│◄────────────┤    Session     ├───────────►│ ActionSelector │
//! │   Pool    │             │ (login/logout) │            │  (9 actions)   │
//! └───────────┘             └───────┬────────┘            └────────────────┘
//!       ▲                           │ get/post
//!  FixtureSet (CSV)          ┌──────▼───────┐  record   ┌───────────────┐
//!  credentials, stream ids,  │  MenuClient  ├──────────►│ StatsRecorder │
//!  category slugs            │  (reqwest)   │           │  (RunSummary) │
//!                            └──────────────┘           └───────────────┘
//! ```
//!
//! The [`runner::LoadRunner`] drives one session per configured user until
//! the run deadline, then aggregates a [`stats::RunSummary`].

#![warn(missing_docs)]

pub mod action;
pub mod assets;
pub mod client;
pub mod config;
pub mod fixture;
pub mod pool;
pub mod provision;
pub mod result;
pub mod runner;
pub mod session;
pub mod stats;

pub use action::{Action, ActionSelector, ActionWeights, PlannedRequest, SEARCH_TERMS};
pub use assets::{discover_and_fetch, extract_resource_urls, MEDIA_PREFIX, STATIC_PREFIX};
pub use client::{MenuClient, TimedResponse, AJAX_MARKER};
pub use config::RunConfig;
pub use fixture::{CategorySlug, Credential, FixtureSet, StreamId};
pub use pool::CredentialPool;
pub use provision::{create_accounts, delete_accounts, AccountStore, MemoryAccountStore};
pub use result::{CargarError, CargarResult};
pub use runner::LoadRunner;
pub use session::{Identity, Session, SessionState};
pub use stats::{EndpointStats, RunSummary, StatsRecorder};
