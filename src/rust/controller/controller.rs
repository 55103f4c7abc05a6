use log::{debug, info, warn};

use super::backend::PredictionBackend;
use super::error::PredictError;
use super::state::{PredictionResult, RequestState, TextStats};
use super::utils::{text_stats, validated_input};

/// Paragraph loaded by [`PredictionController::fill_example`].
pub const EXAMPLE_TEXT: &str = "Officials confirmed the incident occurred on Tuesday, according to a public statement. Local reporters and witnesses corroborated the timeline and no injuries were reported.";

/// A validated submit that is waiting for its outcome.
///
/// Returned by [`PredictionController::begin_submit`] and consumed by
/// [`PredictionController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrediction {
    id: u64,
    text: String,
}

impl PendingPrediction {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The trimmed text that goes into the request body.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Owns the input text and the display state, and drives one prediction
/// request per submit.
///
/// ```rust
/// # use verity::{PredictionController, PredictionBackend, PredictionResult, PredictError, RequestState};
/// # struct Offline;
/// # #[async_trait::async_trait]
/// # impl PredictionBackend for Offline {
/// #     async fn predict(&self, _text: &str) -> Result<PredictionResult, PredictError> {
/// #         Err(PredictError::Transport("Failed to fetch".into()))
/// #     }
/// # }
/// # tokio_test::block_on(async {
/// let mut controller = PredictionController::new(Offline);
/// controller.set_text("too short");
/// let state = controller.submit().await;
/// assert_eq!(state, &RequestState::Error("Enter at least 10 characters.".into()));
/// # });
/// ```
#[derive(Debug)]
pub struct PredictionController<B> {
    backend: B,
    input: String,
    state: RequestState,
    next_ticket: u64,
    /// Tickets with an id at or below this were issued before the last clear.
    cleared_at: u64,
}

impl<B: PredictionBackend> PredictionController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            input: String::new(),
            state: RequestState::Idle,
            next_ticket: 0,
            cleared_at: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn text(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn stats(&self) -> TextStats {
        text_stats(&self.input)
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Whether there is anything to clear while no request is in flight.
    pub fn can_clear(&self) -> bool {
        !self.input.is_empty() && !self.is_loading()
    }

    /// Replaces the input text. The display state is left alone.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Clears the input and returns to [`RequestState::Idle`].
    ///
    /// Predictions still in flight are discarded when they complete.
    pub fn reset(&mut self) {
        self.input.clear();
        self.state = RequestState::Idle;
        self.cleared_at = self.next_ticket;
    }

    /// Loads [`EXAMPLE_TEXT`] and drops any previous result or error.
    ///
    /// Predictions still in flight are discarded when they complete.
    pub fn fill_example(&mut self) {
        self.input = EXAMPLE_TEXT.to_string();
        self.state = RequestState::Idle;
        self.cleared_at = self.next_ticket;
    }

    /// Validates the current input and moves to [`RequestState::Loading`].
    ///
    /// Returns `None` when the input is too short; the state is then the
    /// validation error and no request must be sent.
    pub fn begin_submit(&mut self) -> Option<PendingPrediction> {
        self.state = RequestState::Idle;

        let Some(trimmed) = validated_input(&self.input) else {
            debug!("Rejected input of {} chars", self.input.trim().chars().count());
            self.state = RequestState::Error(PredictError::Validation.display_message());
            return None;
        };

        self.next_ticket += 1;
        let pending = PendingPrediction {
            id: self.next_ticket,
            text: trimmed.to_string(),
        };
        self.state = RequestState::Loading;
        debug!(
            "Prediction {} pending ({} chars)",
            pending.id,
            pending.text.chars().count()
        );
        Some(pending)
    }

    /// Applies the outcome of a pending prediction.
    ///
    /// Tickets issued since the last [`reset`](Self::reset) or
    /// [`fill_example`](Self::fill_example) are not checked against each other:
    /// whichever completes last determines the state. Older tickets are dropped.
    pub fn complete(
        &mut self,
        pending: PendingPrediction,
        outcome: Result<PredictionResult, PredictError>,
    ) -> &RequestState {
        if pending.id <= self.cleared_at {
            debug!("Dropping prediction {} issued before the input was cleared", pending.id);
            return &self.state;
        }

        self.state = match outcome {
            Ok(result) => {
                info!(
                    "Prediction {}: {} ({}%, {} ms)",
                    pending.id,
                    result.label,
                    result.confidence_percent(),
                    result.ms
                );
                RequestState::Success(result)
            }
            Err(err) => {
                warn!("Prediction {} failed: {}", pending.id, err);
                RequestState::Error(err.display_message())
            }
        };
        &self.state
    }

    /// Validates the current input, sends one request and records the outcome.
    pub async fn submit(&mut self) -> &RequestState {
        let Some(pending) = self.begin_submit() else {
            return &self.state;
        };
        let outcome = self.backend.predict(pending.text()).await;
        self.complete(pending, outcome)
    }

    /// [`set_text`](Self::set_text) followed by [`submit`](Self::submit).
    pub async fn submit_text(&mut self, text: impl Into<String>) -> &RequestState {
        self.set_text(text);
        self.submit().await
    }
}
