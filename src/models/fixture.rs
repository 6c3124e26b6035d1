//! Match model representing one football fixture in the feed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Match lifecycle status. Score and live stats are only meaningful while
/// `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "SCHEDULED"),
            MatchStatus::Live => write!(f, "LIVE"),
            MatchStatus::Finished => write!(f, "FINISHED"),
        }
    }
}

/// Three-way decimal odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOdds {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

impl MatchOdds {
    /// All legs strictly positive. Feed entries violating this are rejected
    /// at the boundary, and odds drift preserves it.
    pub fn is_valid(&self) -> bool {
        self.home > Decimal::ZERO && self.draw > Decimal::ZERO && self.away > Decimal::ZERO
    }
}

/// Current score, present only while live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Live in-match statistics as `[home, away]` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub possession: [u32; 2],
    pub shots_on_target: [u32; 2],
    pub corners: [u32; 2],
    pub dangerous_attacks: [u32; 2],
}

/// One football fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Unique, stable identifier assigned at creation; never reused
    pub id: String,

    pub home_team: String,
    pub away_team: String,
    pub league: String,

    /// Scheduled kickoff instant
    pub start_time: DateTime<Utc>,

    #[serde(default)]
    pub status: MatchStatus,

    /// Current bookmaker odds
    pub odds: MatchOdds,

    /// Snapshot of `odds` immediately before the last drift, used to show a
    /// directional delta. Absent until the first mutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_odds: Option<MatchOdds>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MatchStats>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// Display title, e.g. "Benfica vs Sporting CP".
    pub fn title(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }

    /// Case-insensitive substring match against either team or the league.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.home_team.to_lowercase().contains(&q)
            || self.away_team.to_lowercase().contains(&q)
            || self.league.to_lowercase().contains(&q)
    }
}
