//! Prediction orchestrator: selection state plus at-most-one in-flight
//! prediction request tied to the current selection.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::PredictionUnavailable;
use crate::models::PredictionResult;

/// Ticket for one outstanding prediction request. Responses are only applied
/// when their ticket still matches the current selection, so a superseded
/// request can never overwrite a newer one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub request_id: Uuid,
    pub match_id: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Selection {
    Idle,
    Loading {
        match_id: String,
        request_id: Uuid,
    },
    Ready {
        match_id: String,
        prediction: PredictionResult,
    },
}

/// Manages which match is selected and what prediction, if any, exists for
/// it. Predictions are held only for the current selection and discarded
/// when it changes or clears.
#[derive(Debug)]
pub struct PredictionOrchestrator {
    selection: Selection,
}

impl Default for PredictionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionOrchestrator {
    pub fn new() -> Self {
        Self {
            selection: Selection::Idle,
        }
    }

    pub fn selected_match_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Idle => None,
            Selection::Loading { match_id, .. } | Selection::Ready { match_id, .. } => {
                Some(match_id)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.selection, Selection::Loading { .. })
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match &self.selection {
            Selection::Ready { prediction, .. } => Some(prediction),
            _ => None,
        }
    }

    /// Select a match.
    ///
    /// Selecting the already-selected match toggles it off and discards its
    /// prediction, returning `None`. Any other id discards the previous
    /// result or in-flight association and returns a ticket for a new
    /// request; the caller drives the actual call and reports back via
    /// [`PredictionOrchestrator::resolve`].
    pub fn select(&mut self, match_id: &str) -> Option<PredictionRequest> {
        if self.selected_match_id() == Some(match_id) {
            debug!(match_id = %match_id, "Match deselected");
            self.selection = Selection::Idle;
            return None;
        }

        let request = PredictionRequest {
            request_id: Uuid::new_v4(),
            match_id: match_id.to_string(),
        };
        self.selection = Selection::Loading {
            match_id: request.match_id.clone(),
            request_id: request.request_id,
        };
        debug!(match_id = %match_id, request_id = %request.request_id, "Prediction requested");

        Some(request)
    }

    /// Clear any selection, e.g. when navigating away from the detail view.
    pub fn clear(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Apply the outcome of a prediction request.
    ///
    /// A response whose ticket no longer matches the current selection is
    /// ignored. A failure, or a response addressed to the wrong match,
    /// installs the fallback result instead; the selection never ends up in
    /// a hard-failed state. Returns whether the response was applied.
    pub fn resolve(
        &mut self,
        request: &PredictionRequest,
        outcome: Result<PredictionResult, PredictionUnavailable>,
    ) -> bool {
        match &self.selection {
            Selection::Loading {
                match_id,
                request_id,
            } if *request_id == request.request_id && *match_id == request.match_id => {}
            _ => {
                debug!(
                    match_id = %request.match_id,
                    request_id = %request.request_id,
                    "Ignoring stale prediction response"
                );
                return false;
            }
        }

        let prediction = match outcome {
            Ok(p) if p.match_id == request.match_id => p,
            Ok(p) => {
                warn!(
                    expected = %request.match_id,
                    got = %p.match_id,
                    "Prediction addressed to the wrong match; using fallback"
                );
                PredictionResult::fallback_for(&request.match_id)
            }
            Err(e) => {
                warn!(match_id = %request.match_id, error = %e, "Prediction failed; using fallback");
                PredictionResult::fallback_for(&request.match_id)
            }
        };

        self.selection = Selection::Ready {
            match_id: request.match_id.clone(),
            prediction,
        };
        true
    }
}
