//! Domain error taxonomy.
//!
//! Nothing in this core is fatal: a failed feed load leaves the list empty
//! and a failed prediction is replaced by a local fallback result.

use thiserror::Error;

/// The initial match load failed. Surfaced to the caller as a user-visible
/// message; the match list stays empty and manual reload is the recovery
/// path.
#[derive(Debug, Clone, Error)]
#[error("match feed unavailable: {0}")]
pub struct FeedUnavailable(pub String);

/// The remote prediction call failed or returned malformed data. Recovered
/// locally by substituting a fallback result; logged but never shown as a
/// hard error.
#[derive(Debug, Clone, Error)]
#[error("prediction service unavailable: {0}")]
pub struct PredictionUnavailable(pub String);
