//! Root controller owning the application state.
//!
//! The state is split into disjoint slices operated on by independent
//! components: the match set (store), the filter inputs, and the
//! selection/prediction pair (orchestrator). The controller enforces the
//! cross-slice obligations: page resets on filter changes and deselection on
//! view navigation.

use anyhow::{bail, Context, Result};
use rand::Rng;
use tracing::error;

use crate::api::{FeedSource, PredictionProvider};
use crate::feed::{
    filter_matches, leagues, FilterParams, MatchPage, MatchStore, PredictionOrchestrator,
    PredictionRequest, View,
};
use crate::models::{Match, PredictionResult};

/// Application state for one signed-in session.
#[derive(Default)]
pub struct App {
    store: MatchStore,
    params: FilterParams,
    orchestrator: PredictionOrchestrator,
    feed_error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    // --- feed ---

    /// Load the match set from the feed source. On failure the list stays
    /// empty and the error is kept for display; callers re-run to recover.
    pub async fn load_feed(&mut self, source: &dyn FeedSource) -> bool {
        match self.store.load(source).await {
            Ok(_) => {
                self.feed_error = None;
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to load match feed");
                self.feed_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn feed_error(&self) -> Option<&str> {
        self.feed_error.as_deref()
    }

    pub fn matches(&self) -> &[Match] {
        self.store.matches()
    }

    pub fn get_match(&self, id: &str) -> Option<&Match> {
        self.store.get(id)
    }

    pub fn leagues(&self) -> Vec<String> {
        leagues(self.store.matches())
    }

    /// Drive one odds-drift tick; returns ids of matches that moved.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Vec<String> {
        self.store.tick(rng)
    }

    // --- filter inputs ---

    pub fn params(&self) -> &FilterParams {
        &self.params
    }

    /// The currently visible page of the filtered list.
    pub fn visible(&self) -> MatchPage {
        filter_matches(self.store.matches(), &self.params)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.params.query = query.into();
        self.params.page = 1;
    }

    pub fn set_league(&mut self, league: impl Into<String>) {
        self.params.league = league.into();
        self.params.page = 1;
    }

    /// Switch the top-level view. Navigating away from the detail view also
    /// drops the selection and its prediction.
    pub fn set_view(&mut self, view: View) {
        if self.params.view == view {
            return;
        }
        self.params.view = view;
        self.params.page = 1;
        self.orchestrator.clear();
    }

    /// Jump to a page, clamped to the valid range for the current filters.
    pub fn set_page(&mut self, page: usize) {
        let total = self.visible().total_pages;
        self.params.page = page.clamp(1, total);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.params.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.params.page.saturating_sub(1));
    }

    // --- selection & prediction ---

    pub fn selected_match_id(&self) -> Option<&str> {
        self.orchestrator.selected_match_id()
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.orchestrator.prediction()
    }

    pub fn is_loading_prediction(&self) -> bool {
        self.orchestrator.is_loading()
    }

    /// Select a match by id. Returns `None` when this toggled the current
    /// selection off, otherwise the ticket for the prediction request the
    /// caller should drive.
    pub fn select(&mut self, match_id: &str) -> Result<Option<PredictionRequest>> {
        if self.store.get(match_id).is_none() {
            bail!("unknown match id: {}", match_id);
        }
        Ok(self.orchestrator.select(match_id))
    }

    /// Report a prediction outcome back; stale responses are ignored.
    pub fn resolve(
        &mut self,
        request: &PredictionRequest,
        outcome: std::result::Result<PredictionResult, crate::error::PredictionUnavailable>,
    ) -> bool {
        self.orchestrator.resolve(request, outcome)
    }

    /// Select a match and drive its prediction request to completion.
    /// Returns whether a match is selected afterwards (false = toggled off).
    pub async fn request_prediction(
        &mut self,
        provider: &dyn PredictionProvider,
        match_id: &str,
    ) -> Result<bool> {
        let Some(request) = self.select(match_id)? else {
            return Ok(false);
        };

        let m = self
            .store
            .get(match_id)
            .cloned()
            .context("selected match vanished from the store")?;

        let outcome = provider.predict(&m).await;
        self.resolve(&request, outcome);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FeedUnavailable, PredictionUnavailable};
    use crate::feed::SampleFeed;
    use crate::models::RiskLevel;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct DeadFeed;

    #[async_trait]
    impl FeedSource for DeadFeed {
        async fn fetch_matches(&self) -> std::result::Result<Vec<Match>, FeedUnavailable> {
            Err(FeedUnavailable("connection refused".to_string()))
        }
    }

    /// Provider that always fails, or always succeeds for the given match.
    struct StubProvider {
        fail: bool,
    }

    #[async_trait]
    impl PredictionProvider for StubProvider {
        async fn predict(
            &self,
            m: &Match,
        ) -> std::result::Result<PredictionResult, PredictionUnavailable> {
            if self.fail {
                Err(PredictionUnavailable("boom".to_string()))
            } else {
                Ok(PredictionResult {
                    ai_analysis: format!("{} look stronger.", m.home_team),
                    ..PredictionResult::fallback_for(&m.id)
                })
            }
        }
    }

    async fn loaded_app() -> App {
        let mut app = App::new();
        assert!(app.load_feed(&SampleFeed).await);
        app
    }

    #[tokio::test]
    async fn test_feed_failure_leaves_list_empty_with_error() {
        let mut app = App::new();
        assert!(!app.load_feed(&DeadFeed).await);
        assert!(app.matches().is_empty());
        assert!(app.feed_error().unwrap().contains("connection refused"));

        // Manual reload recovers and clears the banner.
        assert!(app.load_feed(&SampleFeed).await);
        assert!(app.feed_error().is_none());
        assert!(!app.matches().is_empty());
    }

    #[tokio::test]
    async fn test_filter_changes_reset_page() {
        let mut app = loaded_app().await;
        app.set_page(3);
        // Sample feed has 14 fixtures = 3 pages
        assert_eq!(app.params().page, 3);

        app.set_query("real");
        assert_eq!(app.params().page, 1);

        app.set_page(1);
        app.set_query("");
        app.set_page(3);
        app.set_league("La Liga");
        assert_eq!(app.params().page, 1);

        app.set_league(crate::feed::ALL_LEAGUES);
        app.set_page(3);
        app.set_view(View::Live);
        assert_eq!(app.params().page, 1);
    }

    #[tokio::test]
    async fn test_page_navigation_is_clamped() {
        let mut app = loaded_app().await;
        let total = app.visible().total_pages;

        app.set_page(999);
        assert_eq!(app.params().page, total);

        app.next_page();
        assert_eq!(app.params().page, total);

        app.set_page(1);
        app.prev_page();
        assert_eq!(app.params().page, 1);
    }

    #[tokio::test]
    async fn test_selection_toggle_through_controller() {
        let mut app = loaded_app().await;
        let provider = StubProvider { fail: false };

        assert!(app.request_prediction(&provider, "m1").await.unwrap());
        assert_eq!(app.selected_match_id(), Some("m1"));
        assert!(app.prediction().is_some());

        // Selecting the same match again deselects it.
        assert!(!app.request_prediction(&provider, "m1").await.unwrap());
        assert_eq!(app.selected_match_id(), None);
        assert!(app.prediction().is_none());
    }

    #[tokio::test]
    async fn test_switching_selection_discards_previous_prediction() {
        let mut app = loaded_app().await;
        let provider = StubProvider { fail: false };

        app.request_prediction(&provider, "m1").await.unwrap();
        app.request_prediction(&provider, "m2").await.unwrap();

        assert_eq!(app.selected_match_id(), Some("m2"));
        assert_eq!(app.prediction().unwrap().match_id, "m2");
    }

    #[tokio::test]
    async fn test_stale_response_is_ignored() {
        let mut app = loaded_app().await;

        let first = app.select("m1").unwrap().unwrap();
        let second = app.select("m2").unwrap().unwrap();

        // m1 resolves after m2 took over the selection.
        assert!(!app.resolve(&first, Ok(PredictionResult::fallback_for("m1"))));
        assert_eq!(app.selected_match_id(), Some("m2"));
        assert!(app.is_loading_prediction());

        assert!(app.resolve(&second, Ok(PredictionResult::fallback_for("m2"))));
        assert_eq!(app.prediction().unwrap().match_id, "m2");
    }

    #[tokio::test]
    async fn test_prediction_failure_yields_fallback() {
        let mut app = loaded_app().await;
        let provider = StubProvider { fail: true };

        assert!(app.request_prediction(&provider, "m2").await.unwrap());

        let prediction = app.prediction().expect("fallback must be installed");
        assert_eq!(prediction.match_id, "m2");
        assert_eq!(prediction.risk_level, RiskLevel::Medium);
        assert_eq!(prediction.confidence_score, 50.0);
        assert!(!app.is_loading_prediction());
    }

    #[tokio::test]
    async fn test_view_navigation_clears_selection() {
        let mut app = loaded_app().await;
        let provider = StubProvider { fail: false };

        app.request_prediction(&provider, "m1").await.unwrap();
        app.set_view(View::Live);

        assert_eq!(app.selected_match_id(), None);
        assert!(app.prediction().is_none());
    }

    #[tokio::test]
    async fn test_selecting_unknown_match_errors() {
        let mut app = loaded_app().await;
        assert!(app.select("nope").is_err());
    }

    #[tokio::test]
    async fn test_tick_moves_odds_through_controller() {
        let mut app = loaded_app().await;
        let mut rng = StdRng::seed_from_u64(5);

        let mut moved_any = false;
        for _ in 0..50 {
            if !app.tick(&mut rng).is_empty() {
                moved_any = true;
            }
        }
        assert!(moved_any);
    }
}
