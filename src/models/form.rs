//! Recent team form shown alongside a prediction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one past match from the team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl FormResult {
    pub fn letter(&self) -> char {
        match self {
            FormResult::W => 'W',
            FormResult::D => 'D',
            FormResult::L => 'L',
        }
    }
}

/// One historical result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalStat {
    pub date: NaiveDate,
    pub score: String,
    pub opponent: String,
    pub result: FormResult,
}
