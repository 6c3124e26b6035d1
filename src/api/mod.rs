//! External collaborators: the match feed and the prediction service.

mod feed_client;
mod prediction_client;
mod types;

pub use feed_client::{FeedClient, FeedSource};
pub use prediction_client::{GeminiClient, GeminiConfig, PredictionProvider};
pub use types::*;
