//! Gemini client for generating betting predictions.
//!
//! One request/response exchange per call, no retries built in; any
//! network, quota or shape failure surfaces as a single opaque
//! `PredictionUnavailable` so the orchestrator can fall back locally.

use std::time::Duration;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::api::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    RawPrediction,
};
use crate::error::PredictionUnavailable;
use crate::models::{Match, PredictionResult, RiskLevel, WinProbability};

/// Remote prediction service boundary: given a match, produce a prediction
/// or fail. Retries, if desired, belong to the caller.
#[async_trait]
pub trait PredictionProvider: Send + Sync {
    async fn predict(&self, m: &Match) -> Result<PredictionResult, PredictionUnavailable>;
}

/// Gemini API client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-pro-preview".to_string(),
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("GEMINI_API_URL").unwrap_or(defaults.base_url),
            model: std::env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            timeout_secs: defaults.timeout_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Client for the Gemini `generateContent` API.
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Prompt encoding the match context: teams, league, status, score, odds.
    fn prompt_for(m: &Match) -> String {
        let score = m
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            r#"Act as a professional sports data analyst and betting specialist. Analyze this football match:
Match: {home} vs {away}
League: {league}
Status: {status}
Current score: {score}
Bookmaker odds: Home({oh}), Draw({od}), Away({oa})

Provide a detailed prediction including:
1. Win probabilities for home, draw and away, as percentages.
2. One recommended bet type.
3. A confidence score (0-100).
4. A predicted final score.
5. A short explanation of the reasoning, based on statistical probability and current form trends.
6. Risk level (LOW, MEDIUM, HIGH)."#,
            home = m.home_team,
            away = m.away_team,
            league = m.league,
            status = m.status,
            score = score,
            oh = m.odds.home,
            od = m.odds.draw,
            oa = m.odds.away,
        )
    }

    /// JSON schema hint sent with the request. The response is still
    /// validated locally; the hint only steers the model.
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "probability": {
                    "type": "OBJECT",
                    "properties": {
                        "homeWin": {"type": "NUMBER"},
                        "draw": {"type": "NUMBER"},
                        "awayWin": {"type": "NUMBER"}
                    },
                    "required": ["homeWin", "draw", "awayWin"]
                },
                "recommendedBet": {"type": "STRING"},
                "confidenceScore": {"type": "NUMBER"},
                "predictedScore": {"type": "STRING"},
                "aiAnalysis": {"type": "STRING"},
                "riskLevel": {"type": "STRING", "enum": ["LOW", "MEDIUM", "HIGH"]}
            },
            "required": [
                "probability", "recommendedBet", "confidenceScore",
                "predictedScore", "aiAnalysis", "riskLevel"
            ]
        })
    }
}

#[async_trait]
impl PredictionProvider for GeminiClient {
    async fn predict(&self, m: &Match) -> Result<PredictionResult, PredictionUnavailable> {
        if !self.is_configured() {
            return Err(PredictionUnavailable(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Self::prompt_for(m),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: Self::response_schema(),
            },
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        debug!(match_id = %m.id, model = %self.config.model, "Requesting prediction");

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PredictionUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Gemini API error");
            return Err(PredictionUnavailable(format!(
                "Gemini API error: {} - {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| PredictionUnavailable(format!("failed to parse API response: {}", e)))?;

        let text = body
            .first_text()
            .ok_or_else(|| PredictionUnavailable("empty model response".to_string()))?;

        let raw: RawPrediction = serde_json::from_str(text)
            .map_err(|e| PredictionUnavailable(format!("malformed prediction payload: {}", e)))?;

        validate_prediction(&m.id, raw)
    }
}

/// Promote the untrusted payload into a `PredictionResult`, rejecting
/// out-of-range percentages and unknown risk levels.
fn validate_prediction(
    match_id: &str,
    raw: RawPrediction,
) -> Result<PredictionResult, PredictionUnavailable> {
    let probability = WinProbability {
        home_win: raw.probability.home_win,
        draw: raw.probability.draw,
        away_win: raw.probability.away_win,
    };

    if !probability.in_range() {
        return Err(PredictionUnavailable(format!(
            "probabilities out of range: {:?}",
            probability
        )));
    }

    if !(0.0..=100.0).contains(&raw.confidence_score) {
        return Err(PredictionUnavailable(format!(
            "confidence score out of range: {}",
            raw.confidence_score
        )));
    }

    let risk_level = RiskLevel::parse(&raw.risk_level).ok_or_else(|| {
        PredictionUnavailable(format!("unknown risk level: {:?}", raw.risk_level))
    })?;

    Ok(PredictionResult {
        match_id: match_id.to_string(),
        probability,
        recommended_bet: raw.recommended_bet,
        confidence_score: raw.confidence_score,
        predicted_score: raw.predicted_score,
        ai_analysis: raw.ai_analysis,
        risk_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::RawProbability;

    fn raw(risk: &str, confidence: f64, home_win: f64) -> RawPrediction {
        RawPrediction {
            probability: RawProbability {
                home_win,
                draw: 25.0,
                away_win: 30.0,
            },
            recommended_bet: "Home win".to_string(),
            confidence_score: confidence,
            predicted_score: "2-1".to_string(),
            ai_analysis: "Home side controls the midfield.".to_string(),
            risk_level: risk.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_conforming_payload() {
        let result = validate_prediction("m1", raw("LOW", 80.0, 45.0)).unwrap();
        assert_eq!(result.match_id, "m1");
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.confidence_score, 80.0);
    }

    #[test]
    fn test_validate_accepts_lowercase_risk() {
        let result = validate_prediction("m1", raw("medium", 50.0, 45.0)).unwrap();
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_validate_rejects_unknown_risk_level() {
        assert!(validate_prediction("m1", raw("SEVERE", 50.0, 45.0)).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        assert!(validate_prediction("m1", raw("LOW", 101.0, 45.0)).is_err());
        assert!(validate_prediction("m1", raw("LOW", -5.0, 45.0)).is_err());
        assert!(validate_prediction("m1", raw("LOW", 50.0, 120.0)).is_err());
    }

    #[test]
    fn test_payload_decoding_requires_all_fields() {
        let missing_risk = r#"{
            "probability": {"homeWin": 40, "draw": 30, "awayWin": 30},
            "recommendedBet": "Draw",
            "confidenceScore": 55,
            "predictedScore": "1-1",
            "aiAnalysis": "Evenly matched."
        }"#;
        assert!(serde_json::from_str::<RawPrediction>(missing_risk).is_err());
    }

    #[test]
    fn test_first_text_extraction() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.first_text(), Some("{}"));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
