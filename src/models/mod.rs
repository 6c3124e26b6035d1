//! Data models for matches, predictions, team form and sessions.

mod fixture;
mod form;
mod prediction;
mod session;

pub use fixture::{Match, MatchOdds, MatchStats, MatchStatus, Score};
pub use form::{FormResult, HistoricalStat};
pub use prediction::{PredictionResult, RiskLevel, WinProbability};
pub use session::UserSession;
