//! Match feed core: store, filtering/pagination, selection and prediction
//! orchestration.

mod filter;
mod orchestrator;
mod sample;
mod store;

pub use filter::{filter_matches, leagues, FilterParams, MatchPage, View, ALL_LEAGUES, PAGE_SIZE};
pub use orchestrator::{PredictionOrchestrator, PredictionRequest};
pub use sample::{sample_matches, team_form, SampleFeed};
pub use store::{MatchStore, TICK_INTERVAL};
