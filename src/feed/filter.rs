//! Pure filtering and pagination over the match list.
//!
//! Deterministic in its inputs with no hidden state; safe to call on every
//! input change. Insertion order is preserved through every stage.

use clap::ValueEnum;

use crate::models::Match;

/// Fixed number of matches per page.
pub const PAGE_SIZE: usize = 6;

/// Sentinel league meaning "no league restriction".
pub const ALL_LEAGUES: &str = "all";

/// Top-level dashboard view. Only `Live` restricts the match list by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    #[default]
    Dashboard,
    Live,
    History,
    Docs,
}

/// Current filter inputs. `page` is 1-based.
///
/// Resetting `page` to 1 when query, view or league change is the caller's
/// obligation (see `App`), not something this engine infers.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    pub query: String,
    pub league: String,
    pub view: View,
    pub page: usize,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            league: ALL_LEAGUES.to_string(),
            view: View::Dashboard,
            page: 1,
        }
    }
}

/// One visible page of the filtered match list.
#[derive(Debug, Clone)]
pub struct MatchPage {
    pub matches: Vec<Match>,
    /// The requested page, echoed back
    pub page: usize,
    /// ceil(filtered / PAGE_SIZE), minimum 1 even for an empty result
    pub total_pages: usize,
    pub total_matches: usize,
}

/// Apply status, league and query restrictions in order, then slice out the
/// requested page.
pub fn filter_matches(matches: &[Match], params: &FilterParams) -> MatchPage {
    let query = params.query.trim();

    let filtered: Vec<&Match> = matches
        .iter()
        .filter(|m| params.view != View::Live || m.is_live())
        .filter(|m| params.league == ALL_LEAGUES || m.league == params.league)
        .filter(|m| query.is_empty() || m.matches_query(query))
        .collect();

    let total_matches = filtered.len();
    let total_pages = (total_matches.div_ceil(PAGE_SIZE)).max(1);

    let page = params.page.max(1);
    let start = (page - 1) * PAGE_SIZE;
    let matches = filtered
        .into_iter()
        .skip(start)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    MatchPage {
        matches,
        page,
        total_pages,
        total_matches,
    }
}

/// Distinct league names present in the feed, sorted.
pub fn leagues(matches: &[Match]) -> Vec<String> {
    let mut names: Vec<String> = matches.iter().map(|m| m.league.clone()).collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchOdds, MatchStatus, Score};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn fixture(id: &str, home: &str, away: &str, league: &str, status: MatchStatus) -> Match {
        Match {
            id: id.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            league: league.to_string(),
            start_time: Utc::now(),
            status,
            odds: MatchOdds {
                home: dec!(2.10),
                draw: dec!(3.40),
                away: dec!(3.20),
            },
            previous_odds: None,
            score: (status == MatchStatus::Live).then_some(Score { home: 1, away: 0 }),
            stats: None,
        }
    }

    fn two_matches() -> Vec<Match> {
        vec![
            fixture(
                "m1",
                "Benfica",
                "Sporting CP",
                "Liga Portugal",
                MatchStatus::Scheduled,
            ),
            fixture(
                "m2",
                "Real Madrid",
                "Barcelona",
                "La Liga",
                MatchStatus::Live,
            ),
        ]
    }

    #[test]
    fn test_live_view_restricts_to_live_matches() {
        let matches = two_matches();
        let params = FilterParams {
            view: View::Live,
            ..Default::default()
        };

        let page = filter_matches(&matches, &params);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.matches[0].id, "m2");
    }

    #[test]
    fn test_dashboard_view_imposes_no_status_restriction() {
        let matches = two_matches();
        let page = filter_matches(&matches, &FilterParams::default());
        assert_eq!(page.total_matches, 2);
    }

    #[test]
    fn test_league_filter_is_exact() {
        let matches = two_matches();
        let params = FilterParams {
            league: "La Liga".to_string(),
            ..Default::default()
        };

        let page = filter_matches(&matches, &params);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.matches[0].id, "m2");
    }

    #[test]
    fn test_query_matches_any_field_case_insensitively() {
        let matches = two_matches();

        for query in ["real", "REAL", "barce", "la lig"] {
            let params = FilterParams {
                query: query.to_string(),
                ..Default::default()
            };
            let page = filter_matches(&matches, &params);
            assert_eq!(page.total_matches, 1, "query {:?}", query);
            assert_eq!(page.matches[0].id, "m2");
        }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let matches: Vec<Match> = (0..20)
            .map(|i| {
                fixture(
                    &format!("m{i}"),
                    "Home",
                    "Away",
                    "League",
                    MatchStatus::Scheduled,
                )
            })
            .collect();

        let page = filter_matches(&matches, &FilterParams::default());
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.matches.len(), PAGE_SIZE);

        let last = filter_matches(
            &matches,
            &FilterParams {
                page: 4,
                ..Default::default()
            },
        );
        assert_eq!(last.matches.len(), 2);
    }

    #[test]
    fn test_empty_result_still_has_one_page() {
        let matches = two_matches();
        let params = FilterParams {
            query: "no such team".to_string(),
            ..Default::default()
        };

        let page = filter_matches(&matches, &params);
        assert_eq!(page.total_matches, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.matches.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut matches = two_matches();
        matches.push(fixture(
            "m3",
            "Atletico",
            "Sevilla",
            "La Liga",
            MatchStatus::Scheduled,
        ));

        let params = FilterParams {
            league: "La Liga".to_string(),
            ..Default::default()
        };
        let page = filter_matches(&matches, &params);
        let ids: Vec<&str> = page.matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3"]);
    }

    #[test]
    fn test_leagues_are_distinct_and_sorted() {
        let mut matches = two_matches();
        matches.push(fixture(
            "m3",
            "Atletico",
            "Sevilla",
            "La Liga",
            MatchStatus::Scheduled,
        ));

        assert_eq!(leagues(&matches), vec!["La Liga", "Liga Portugal"]);
    }
}
