use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use verity::{
    PredictError, PredictionBackend, PredictionController, PredictionResult, RequestState, Verdict,
};

/// Replays queued outcomes and records every text it was asked to classify.
#[derive(Default)]
struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<PredictionResult, PredictError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn with(outcome: Result<PredictionResult, PredictError>) -> Self {
        let backend = Self::default();
        backend.outcomes.lock().unwrap().push_back(outcome);
        backend
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionBackend for ScriptedBackend {
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        self.requests.lock().unwrap().push(text.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PredictError::Transport("no scripted outcome".into())))
    }
}

fn unreliable() -> PredictionResult {
    PredictionResult {
        label: "Unreliable".into(),
        prediction: Verdict::Unreliable,
        confidence: 0.87,
        ms: 42,
    }
}

#[tokio::test]
async fn test_short_input_never_reaches_backend() {
    let mut controller = PredictionController::new(ScriptedBackend::default());

    for input in ["", "         ", "short", "  123456789  ", "\n\tnine char\n"] {
        let state = controller.submit_text(input).await;
        assert_eq!(state, &RequestState::Error("Enter at least 10 characters.".into()));
    }

    assert!(controller.backend().requests().is_empty());
}

#[tokio::test]
async fn test_success_sets_result() {
    let mut controller = PredictionController::new(ScriptedBackend::with(Ok(unreliable())));

    let state = controller.submit_text("  Shocking claim spreads online  ").await.clone();

    let result = state.result().expect("success state");
    assert_eq!(result.label, "Unreliable");
    assert_eq!(result.prediction, Verdict::Unreliable);
    assert_eq!(result.confidence_percent(), 87);
    assert_eq!(result.ms, 42);
    assert_eq!(
        controller.backend().requests(),
        vec!["Shocking claim spreads online".to_string()]
    );
}

#[tokio::test]
async fn test_server_detail_becomes_message() {
    let backend = ScriptedBackend::with(Err(PredictError::Server {
        status: StatusCode::SERVICE_UNAVAILABLE,
        detail: Some("model unavailable".into()),
    }));
    let mut controller = PredictionController::new(backend);

    let state = controller.submit_text("A long enough piece of news").await;
    assert_eq!(state.error(), Some("model unavailable"));
}

#[tokio::test]
async fn test_unparsable_failure_uses_generic_message() {
    let backend = ScriptedBackend::with(Err(PredictError::Server {
        status: StatusCode::BAD_GATEWAY,
        detail: None,
    }));
    let mut controller = PredictionController::new(backend);

    let state = controller.submit_text("A long enough piece of news").await;
    assert_eq!(state.error(), Some("Prediction failed."));
}

#[tokio::test]
async fn test_transport_failures() {
    let backend = ScriptedBackend::default();
    {
        let mut outcomes = backend.outcomes.lock().unwrap();
        outcomes.push_back(Err(PredictError::Transport("Failed to fetch".into())));
        outcomes.push_back(Err(PredictError::Transport("connection reset by peer".into())));
    }
    let mut controller = PredictionController::new(backend);

    let state = controller.submit_text("A long enough piece of news").await;
    assert_eq!(
        state.error(),
        Some("Failed to reach backend. This is usually CORS or backend downtime.")
    );

    let state = controller.submit().await;
    assert_eq!(state.error(), Some("connection reset by peer"));
}

#[tokio::test]
async fn test_new_submit_replaces_previous_outcome() {
    let backend = ScriptedBackend::default();
    {
        let mut outcomes = backend.outcomes.lock().unwrap();
        outcomes.push_back(Err(PredictError::Transport("timed out".into())));
        outcomes.push_back(Ok(unreliable()));
    }
    let mut controller = PredictionController::new(backend);
    controller.set_text("A long enough piece of news");

    assert!(controller.submit().await.error().is_some());
    assert!(controller.submit().await.result().is_some());

    // A failed validation clears the earlier result.
    let state = controller.submit_text("tiny").await;
    assert!(state.result().is_none());
    assert_eq!(controller.backend().requests().len(), 2);
}

#[tokio::test]
async fn test_reset_from_any_state() {
    let mut controller = PredictionController::new(ScriptedBackend::with(Ok(unreliable())));

    controller.reset();
    assert_eq!(controller.text(), "");
    assert_eq!(controller.state(), &RequestState::Idle);

    controller.submit_text("A long enough piece of news").await;
    controller.reset();
    assert_eq!(controller.text(), "");
    assert_eq!(controller.state(), &RequestState::Idle);

    controller.submit_text("short").await;
    controller.reset();
    assert_eq!(controller.text(), "");
    assert_eq!(controller.state(), &RequestState::Idle);

    controller.set_text("A long enough piece of news");
    let _pending = controller.begin_submit().unwrap();
    assert!(controller.is_loading());
    controller.reset();
    assert_eq!(controller.text(), "");
    assert_eq!(controller.state(), &RequestState::Idle);
}

#[test]
fn test_overlapping_submits_last_completion_wins() -> Result<(), PredictError> {
    let mut controller = PredictionController::new(ScriptedBackend::default());

    controller.set_text("First article text here");
    let first = controller.begin_submit().ok_or(PredictError::Validation)?;
    controller.set_text("Second article text here");
    let second = controller.begin_submit().ok_or(PredictError::Validation)?;
    assert_ne!(first.id(), second.id());

    // The second request answers first, then the first one arrives late.
    controller.complete(second, Ok(unreliable()));
    let state = controller.complete(first, Err(PredictError::Transport("timed out".into())));

    assert_eq!(state, &RequestState::Error("timed out".into()));
    Ok(())
}

#[test]
fn test_fill_example_then_stats() {
    let mut controller = PredictionController::new(ScriptedBackend::default());
    controller.set_text("  two words ");
    let stats = controller.stats();
    assert_eq!(stats.words, 2);
    assert_eq!(stats.chars, 12);
    assert!(controller.can_clear());

    controller.fill_example();
    assert_eq!(controller.text(), verity::EXAMPLE_TEXT);
    assert_eq!(controller.state(), &RequestState::Idle);

    controller.reset();
    assert!(!controller.can_clear());
}

#[test]
fn test_late_outcome_after_reset_is_dropped() -> Result<(), PredictError> {
    let mut controller = PredictionController::new(ScriptedBackend::default());
    controller.set_text("A long enough piece of news");
    let pending = controller.begin_submit().ok_or(PredictError::Validation)?;

    controller.reset();
    let state = controller.complete(pending, Err(PredictError::Transport("timed out".into())));

    assert_eq!(state, &RequestState::Idle);
    assert_eq!(controller.text(), "");
    Ok(())
}

#[test]
fn test_late_outcome_after_fill_example_is_dropped() -> Result<(), PredictError> {
    let mut controller = PredictionController::new(ScriptedBackend::default());
    controller.set_text("A long enough piece of news");
    let stale = controller.begin_submit().ok_or(PredictError::Validation)?;

    controller.fill_example();
    let fresh = controller.begin_submit().ok_or(PredictError::Validation)?;
    assert_eq!(fresh.text(), verity::EXAMPLE_TEXT);

    controller.complete(fresh, Ok(unreliable()));
    let state = controller.complete(stale, Err(PredictError::Transport("timed out".into())));

    assert_eq!(state.result(), Some(&unreliable()));
    Ok(())
}
