//! Match store: owns the canonical feed and applies periodic odds drift.

use std::time::Duration;

use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::api::FeedSource;
use crate::error::FeedUnavailable;
use crate::models::{Match, MatchOdds};

/// Interval between odds-drift ticks while the feed is active.
pub const TICK_INTERVAL: Duration = Duration::from_secs(4);

/// Probability that a given match's odds move on one tick.
const DRIFT_PROBABILITY: f64 = 0.15;

/// Each odds leg is scaled by an independent uniform factor in
/// [1 - DRIFT_SPAN, 1 + DRIFT_SPAN].
const DRIFT_SPAN: f64 = 0.01;

/// Authoritative in-memory set of matches for the current session.
///
/// Matches are created in bulk by [`MatchStore::load`], mutated in place by
/// [`MatchStore::tick`], and never deleted during a session; the whole set is
/// replaced on the next load.
#[derive(Debug, Default)]
pub struct MatchStore {
    matches: Vec<Match>,
    loaded: bool,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the feed with a fresh fetch from the source. On failure the
    /// store keeps its previous contents (empty on first load) and the error
    /// is surfaced to the caller.
    pub async fn load(&mut self, source: &dyn FeedSource) -> Result<usize, FeedUnavailable> {
        let matches = source.fetch_matches().await?;
        info!(count = matches.len(), "Match feed loaded");
        self.matches = matches;
        self.loaded = true;
        Ok(self.matches.len())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get(&self, id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// One activation of the odds-drift timer.
    ///
    /// Each match independently moves with probability `DRIFT_PROBABILITY`.
    /// A moved match snapshots its odds into `previous_odds` first, so
    /// consumers always see the delta of the latest move only. Matches not
    /// selected for a move are left untouched (no `previous_odds` churn).
    /// A no-op before the first successful load.
    ///
    /// Returns the ids of the matches that moved.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Vec<String> {
        if !self.loaded {
            return Vec::new();
        }

        let mut moved = Vec::new();
        for m in &mut self.matches {
            if rng.gen::<f64>() >= DRIFT_PROBABILITY {
                continue;
            }

            m.previous_odds = Some(m.odds);
            m.odds = MatchOdds {
                home: drift(m.odds.home, rng),
                draw: drift(m.odds.draw, rng),
                away: drift(m.odds.away, rng),
            };

            debug!(
                id = %m.id,
                home = %m.odds.home,
                draw = %m.odds.draw,
                away = %m.odds.away,
                "Odds moved"
            );
            moved.push(m.id.clone());
        }

        moved
    }
}

/// Scale one odds leg by a uniform random factor and round to 2 decimal
/// places. The factor is always positive, so a positive leg stays positive.
fn drift<R: Rng>(value: Decimal, rng: &mut R) -> Decimal {
    let factor = rng.gen_range(1.0 - DRIFT_SPAN..=1.0 + DRIFT_SPAN);
    let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ONE);
    (value * factor).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::sample_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn loaded_store() -> MatchStore {
        let mut store = MatchStore::new();
        store.matches = sample_matches();
        store.loaded = true;
        store
    }

    #[test]
    fn test_tick_before_load_is_noop() {
        let mut store = MatchStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(store.tick(&mut rng).is_empty());
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_odds_stay_positive_and_two_dp() {
        let mut store = loaded_store();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            store.tick(&mut rng);
            for m in store.matches() {
                assert!(m.odds.is_valid(), "odds went non-positive for {}", m.id);
                for leg in [m.odds.home, m.odds.draw, m.odds.away] {
                    assert_eq!(leg, leg.round_dp(2), "odds not rounded to 2dp for {}", m.id);
                }
            }
        }
    }

    #[test]
    fn test_previous_odds_is_latest_snapshot_only() {
        let mut store = loaded_store();
        let mut rng = StdRng::seed_from_u64(7);

        // Run ticks until some match has moved at least twice, checking each
        // time that previous_odds equals the odds held just before that tick.
        let mut move_counts: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();

        for _ in 0..200 {
            let before: Vec<Match> = store.matches().to_vec();
            let moved = store.tick(&mut rng);

            for id in &moved {
                let prior = before.iter().find(|m| &m.id == id).unwrap();
                let current = store.get(id).unwrap();
                assert_eq!(current.previous_odds, Some(prior.odds));
                *move_counts.entry(id.clone()).or_insert(0) += 1;
            }
        }

        assert!(
            move_counts.values().any(|&n| n >= 2),
            "expected at least one match to move twice"
        );
    }

    #[test]
    fn test_untouched_matches_are_left_identical() {
        let mut store = loaded_store();
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..50 {
            let before: Vec<Match> = store.matches().to_vec();
            let moved = store.tick(&mut rng);

            for (prior, current) in before.iter().zip(store.matches()) {
                if !moved.contains(&current.id) {
                    assert_eq!(prior, current, "unmoved match {} changed", current.id);
                }
            }
        }
    }

    #[test]
    fn test_insertion_order_is_stable_across_ticks() {
        let mut store = loaded_store();
        let ids: Vec<String> = store.matches().iter().map(|m| m.id.clone()).collect();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..100 {
            store.tick(&mut rng);
        }

        let after: Vec<String> = store.matches().iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, after);
    }
}
