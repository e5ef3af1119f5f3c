//! Weighted action selection and request planning.
//!
//! Each active session repeatedly draws one of nine actions from an
//! explicit discrete distribution (uniform unless configured otherwise)
//! and turns it into a concrete request plan. Planning is synchronous and
//! side-effect free so the chosen path and its normalized metric name can
//! be asserted without a server.

use crate::fixture::{CategorySlug, StreamId};
use crate::result::{CargarError, CargarResult};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Search terms cycled through by the search action.
pub const SEARCH_TERMS: [&str; 7] = [
    "research",
    "presentations",
    "llamigos",
    "yellowstone",
    "spring",
    "sintel",
    "bunny",
];

/// The nine user actions a session can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Main page
    Index,
    /// Main page with a search query
    Search,
    /// Main page filtered by category
    FilterByCategory,
    /// Trending section
    Trending,
    /// Editors' choice section
    EditorsChoice,
    /// Liked streams section
    Liked,
    /// Stream detail page
    Detail,
    /// Open a stream
    Open,
    /// Like a stream (AJAX)
    Like,
}

impl Action {
    /// All actions, in distribution order.
    pub const ALL: [Self; 9] = [
        Self::Index,
        Self::Search,
        Self::FilterByCategory,
        Self::Trending,
        Self::EditorsChoice,
        Self::Liked,
        Self::Detail,
        Self::Open,
        Self::Like,
    ];

    /// Short name used in configuration and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Search => "search",
            Self::FilterByCategory => "filter_by_category",
            Self::Trending => "trending",
            Self::EditorsChoice => "editors_choice",
            Self::Liked => "liked",
            Self::Detail => "detail",
            Self::Open => "open",
            Self::Like => "like",
        }
    }

    /// Whether the action's response is scanned for static assets.
    /// Open and like responses are not page loads, so they are skipped.
    #[must_use]
    pub fn discovers_assets(self) -> bool {
        !matches!(self, Self::Open | Self::Like)
    }
}

/// Per-action selection weights. Defaults to uniform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionWeights {
    /// Weight of the index action
    #[serde(default = "default_weight")]
    pub index: f64,
    /// Weight of the search action
    #[serde(default = "default_weight")]
    pub search: f64,
    /// Weight of the category filter action
    #[serde(default = "default_weight")]
    pub filter_by_category: f64,
    /// Weight of the trending action
    #[serde(default = "default_weight")]
    pub trending: f64,
    /// Weight of the editors' choice action
    #[serde(default = "default_weight")]
    pub editors_choice: f64,
    /// Weight of the liked-streams action
    #[serde(default = "default_weight")]
    pub liked: f64,
    /// Weight of the stream detail action
    #[serde(default = "default_weight")]
    pub detail: f64,
    /// Weight of the stream open action
    #[serde(default = "default_weight")]
    pub open: f64,
    /// Weight of the stream like action
    #[serde(default = "default_weight")]
    pub like: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for ActionWeights {
    fn default() -> Self {
        Self {
            index: 1.0,
            search: 1.0,
            filter_by_category: 1.0,
            trending: 1.0,
            editors_choice: 1.0,
            liked: 1.0,
            detail: 1.0,
            open: 1.0,
            like: 1.0,
        }
    }
}

impl ActionWeights {
    /// Uniform weights over all nine actions.
    #[must_use]
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Weight of a single action.
    #[must_use]
    pub fn weight(&self, action: Action) -> f64 {
        match action {
            Action::Index => self.index,
            Action::Search => self.search,
            Action::FilterByCategory => self.filter_by_category,
            Action::Trending => self.trending,
            Action::EditorsChoice => self.editors_choice,
            Action::Liked => self.liked,
            Action::Detail => self.detail,
            Action::Open => self.open,
            Action::Like => self.like,
        }
    }

    /// Set the weight of a single action.
    #[must_use]
    pub fn with_weight(mut self, action: Action, weight: f64) -> Self {
        match action {
            Action::Index => self.index = weight,
            Action::Search => self.search = weight,
            Action::FilterByCategory => self.filter_by_category = weight,
            Action::Trending => self.trending = weight,
            Action::EditorsChoice => self.editors_choice = weight,
            Action::Liked => self.liked = weight,
            Action::Detail => self.detail = weight,
            Action::Open => self.open = weight,
            Action::Like => self.like = weight,
        }
        self
    }

    /// Weights in `Action::ALL` order.
    #[must_use]
    pub fn as_array(&self) -> [f64; 9] {
        [
            self.index,
            self.search,
            self.filter_by_category,
            self.trending,
            self.editors_choice,
            self.liked,
            self.detail,
            self.open,
            self.like,
        ]
    }

    /// Check the weights describe a usable distribution.
    pub fn validate(&self) -> CargarResult<()> {
        let weights = self.as_array();
        for (action, weight) in Action::ALL.iter().zip(weights) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(CargarError::config(format!(
                    "weight for {} must be finite and non-negative, got {weight}",
                    action.name()
                )));
            }
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(CargarError::config("at least one action weight must be positive"));
        }
        Ok(())
    }
}

/// A concrete request derived from one action selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRequest {
    /// The selected action
    pub action: Action,
    /// Request path, including any literal parameter
    pub path: String,
    /// Normalized metric name the request reports under
    pub name: &'static str,
    /// Whether the request carries the AJAX marker header
    pub ajax: bool,
}

/// Draws actions from the configured distribution and plans requests
/// from the shared fixture sequences.
#[derive(Debug)]
pub struct ActionSelector {
    dist: WeightedIndex<f64>,
    stream_ids: Arc<Vec<StreamId>>,
    category_slugs: Arc<Vec<CategorySlug>>,
}

impl ActionSelector {
    /// Build a selector over the given weights and fixture sequences.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the weights do not form a valid
    /// distribution.
    pub fn new(
        weights: &ActionWeights,
        stream_ids: Arc<Vec<StreamId>>,
        category_slugs: Arc<Vec<CategorySlug>>,
    ) -> CargarResult<Self> {
        weights.validate()?;
        let dist = WeightedIndex::new(weights.as_array())
            .map_err(|e| CargarError::config(format!("invalid action weights: {e}")))?;
        Ok(Self {
            dist,
            stream_ids,
            category_slugs,
        })
    }

    /// Draw one action and plan its request.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> PlannedRequest {
        let action = Action::ALL[self.dist.sample(rng)];
        self.plan_action(action, rng)
    }

    /// Plan the request for a specific action.
    pub fn plan_action<R: Rng + ?Sized>(&self, action: Action, rng: &mut R) -> PlannedRequest {
        match action {
            Action::Index => plain(action, "/".to_string(), "/"),
            Action::Search => {
                let term = SEARCH_TERMS.choose(rng).copied().unwrap_or(SEARCH_TERMS[0]);
                plain(action, format!("/?query={term}"), "/?query=<query>")
            }
            Action::FilterByCategory => match self.category_slugs.choose(rng) {
                Some(slug) => plain(
                    action,
                    format!("/?category={slug}"),
                    "/?category=<slug>",
                ),
                None => plain(Action::Index, "/".to_string(), "/"),
            },
            Action::Trending => plain(action, "/trending/".to_string(), "/trending/"),
            Action::EditorsChoice => {
                plain(action, "/editors_choice/".to_string(), "/editors_choice/")
            }
            Action::Liked => plain(action, "/liked/".to_string(), "/liked/"),
            Action::Detail => match self.stream_ids.choose(rng) {
                Some(id) => plain(action, format!("/detail/{id}/"), "/detail/<id>"),
                None => plain(Action::Index, "/".to_string(), "/"),
            },
            Action::Open => match self.stream_ids.choose(rng) {
                Some(id) => plain(action, format!("/detail/open/{id}/"), "/detail/open/<id>"),
                None => plain(Action::Index, "/".to_string(), "/"),
            },
            Action::Like => match self.stream_ids.choose(rng) {
                Some(id) => PlannedRequest {
                    action,
                    path: format!("/detail/like_stream/{id}/"),
                    name: "/detail/like_stream/<id>",
                    ajax: true,
                },
                None => plain(Action::Index, "/".to_string(), "/"),
            },
        }
    }
}

fn plain(action: Action, path: String, name: &'static str) -> PlannedRequest {
    PlannedRequest {
        action,
        path,
        name,
        ajax: false,
    }
}
