//! AI prediction result for exactly one match.

use serde::{Deserialize, Serialize};

/// Risk rating attached to a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

impl RiskLevel {
    /// Parse the model's string, case-insensitively. Anything outside the
    /// three-valued enum is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MEDIUM" => Some(RiskLevel::Medium),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

/// Win probabilities as percentages. Values come from an external model and
/// are displayed as-is; they are not required to sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbability {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl WinProbability {
    /// Every component within [0, 100].
    pub fn in_range(&self) -> bool {
        [self.home_win, self.draw, self.away_win]
            .iter()
            .all(|p| (0.0..=100.0).contains(p))
    }
}

/// AI-generated betting analysis for one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub match_id: String,
    pub probability: WinProbability,
    pub recommended_bet: String,
    /// Confidence in [0, 100]
    pub confidence_score: f64,
    /// Free-text score string, e.g. "2-1"
    pub predicted_score: String,
    pub ai_analysis: String,
    pub risk_level: RiskLevel,
}

impl PredictionResult {
    /// Fixed statistical fallback used when the remote model cannot be
    /// reached or returns garbage, so the caller always has something to
    /// render.
    pub fn fallback_for(match_id: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            probability: WinProbability {
                home_win: 45.0,
                draw: 25.0,
                away_win: 30.0,
            },
            recommended_bet: "Home win (baseline)".to_string(),
            confidence_score: 50.0,
            predicted_score: "2-1".to_string(),
            ai_analysis: "The AI engine could not be reached. Showing the baseline \
                          statistical model derived from bookmaker odds."
                .to_string(),
            risk_level: RiskLevel::Medium,
        }
    }
}
