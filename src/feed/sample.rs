//! Built-in fixture feed, used for offline mode and tests when no external
//! feed is configured.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::api::FeedSource;
use crate::error::FeedUnavailable;
use crate::models::{
    FormResult, HistoricalStat, Match, MatchOdds, MatchStats, MatchStatus, Score,
};

/// Feed source backed by the bundled fixture set.
#[derive(Debug, Default)]
pub struct SampleFeed;

#[async_trait]
impl FeedSource for SampleFeed {
    async fn fetch_matches(&self) -> Result<Vec<Match>, FeedUnavailable> {
        Ok(sample_matches())
    }
}

fn scheduled(
    id: &str,
    home: &str,
    away: &str,
    league: &str,
    starts_in_mins: i64,
    odds: (Decimal, Decimal, Decimal),
) -> Match {
    Match {
        id: id.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        league: league.to_string(),
        start_time: Utc::now() + Duration::minutes(starts_in_mins),
        status: MatchStatus::Scheduled,
        odds: MatchOdds {
            home: odds.0,
            draw: odds.1,
            away: odds.2,
        },
        previous_odds: None,
        score: None,
        stats: None,
    }
}

fn live(
    id: &str,
    home: &str,
    away: &str,
    league: &str,
    score: (u32, u32),
    odds: (Decimal, Decimal, Decimal),
    stats: MatchStats,
) -> Match {
    Match {
        id: id.to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
        league: league.to_string(),
        start_time: Utc::now(),
        status: MatchStatus::Live,
        odds: MatchOdds {
            home: odds.0,
            draw: odds.1,
            away: odds.2,
        },
        previous_odds: None,
        score: Some(Score {
            home: score.0,
            away: score.1,
        }),
        stats: Some(stats),
    }
}

/// The bundled fixture set: a world tour of leagues with a few matches in
/// play, enough to exercise league/status filters and pagination.
pub fn sample_matches() -> Vec<Match> {
    vec![
        scheduled(
            "m1",
            "Benfica",
            "Sporting CP",
            "Liga Portugal",
            60,
            (dec!(2.10), dec!(3.40), dec!(3.20)),
        ),
        live(
            "m2",
            "Real Madrid",
            "Barcelona",
            "La Liga",
            (1, 0),
            (dec!(1.65), dec!(4.00), dec!(5.50)),
            MatchStats {
                possession: [55, 45],
                shots_on_target: [4, 2],
                corners: [5, 3],
                dangerous_attacks: [42, 38],
            },
        ),
        scheduled(
            "m3",
            "Man City",
            "Liverpool",
            "Premier League",
            120,
            (dec!(1.85), dec!(3.80), dec!(4.20)),
        ),
        scheduled(
            "m4",
            "Bayern Munich",
            "Dortmund",
            "Bundesliga",
            240,
            (dec!(1.50), dec!(4.50), dec!(6.00)),
        ),
        scheduled(
            "m5",
            "Juventus",
            "Inter Milan",
            "Serie A",
            300,
            (dec!(2.40), dec!(3.20), dec!(2.90)),
        ),
        scheduled(
            "m6",
            "PSG",
            "Marseille",
            "Ligue 1",
            360,
            (dec!(1.40), dec!(5.00), dec!(7.50)),
        ),
        live(
            "m7",
            "Black Bulls",
            "Ferroviario Maputo",
            "Mocambola",
            (2, 2),
            (dec!(2.10), dec!(2.80), dec!(3.50)),
            MatchStats {
                possession: [50, 50],
                shots_on_target: [6, 7],
                corners: [4, 5],
                dangerous_attacks: [55, 61],
            },
        ),
        scheduled(
            "m8",
            "Costa do Sol",
            "UD Songo",
            "Mocambola",
            83,
            (dec!(2.20), dec!(3.00), dec!(3.20)),
        ),
        scheduled(
            "m9",
            "Al Ahly",
            "Zamalek",
            "Egyptian Premier League",
            150,
            (dec!(1.90), dec!(3.30), dec!(4.10)),
        ),
        scheduled(
            "m10",
            "Mamelodi Sundowns",
            "Orlando Pirates",
            "South African PSL",
            50,
            (dec!(1.75), dec!(3.40), dec!(5.00)),
        ),
        scheduled(
            "m11",
            "Flamengo",
            "Palmeiras",
            "Brasileirao",
            200,
            (dec!(2.05), dec!(3.25), dec!(3.60)),
        ),
        scheduled(
            "m12",
            "River Plate",
            "Boca Juniors",
            "Argentine Primera",
            250,
            (dec!(2.15), dec!(3.10), dec!(3.40)),
        ),
        live(
            "m13",
            "Al-Hilal",
            "Al-Nassr",
            "Saudi Pro League",
            (0, 1),
            (dec!(2.50), dec!(3.50), dec!(2.60)),
            MatchStats {
                possession: [48, 52],
                shots_on_target: [2, 5],
                corners: [3, 2],
                dangerous_attacks: [31, 45],
            },
        ),
        scheduled(
            "m14",
            "Inter Miami",
            "LA Galaxy",
            "MLS",
            420,
            (dec!(1.80), dec!(3.90), dec!(4.00)),
        ),
    ]
}

/// Mocked recent form for a team, mirroring what a real data provider would
/// return: newest first, one match every three days.
pub fn team_form(team: &str) -> Vec<HistoricalStat> {
    let results = [
        FormResult::W,
        FormResult::W,
        FormResult::D,
        FormResult::W,
        FormResult::L,
    ];

    results
        .iter()
        .enumerate()
        .map(|(i, &result)| {
            let score = match result {
                FormResult::W => "2-1",
                FormResult::D => "1-1",
                FormResult::L => "0-2",
            };
            HistoricalStat {
                date: (Utc::now() - Duration::days((i as i64 + 1) * 3)).date_naive(),
                score: score.to_string(),
                opponent: format!("{} Rival {}", team, i + 1),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchStatus;

    #[tokio::test]
    async fn test_sample_feed_serves_valid_fixtures() {
        let matches = SampleFeed.fetch_matches().await.unwrap();

        assert!(matches.len() > crate::feed::PAGE_SIZE, "need >1 page");
        for m in &matches {
            assert!(m.odds.is_valid(), "bad odds in {}", m.id);
            assert!(m.previous_odds.is_none());
            // Score and stats only appear on live matches
            if m.status != MatchStatus::Live {
                assert!(m.score.is_none());
                assert!(m.stats.is_none());
            } else {
                assert!(m.score.is_some());
            }
        }

        let mut ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), matches.len(), "duplicate fixture ids");
    }

    #[test]
    fn test_team_form_shape() {
        let form = team_form("Benfica");
        assert_eq!(form.len(), 5);
        assert_eq!(form[0].result, FormResult::W);
        assert_eq!(form[4].result, FormResult::L);
        assert!(form[0].date > form[4].date);
    }
}
