//! Client library for a remote fake news prediction service.
//!
//! The [`PredictionController`] owns the user's text and a four-state
//! [`RequestState`]. Each submit validates the text locally, sends one
//! `POST {base}/predict` through a [`PredictionBackend`], and folds the outcome
//! into the state.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use verity::{ApiClient, ClientConfig, PredictionController, RequestState};
//!
//! let config = ClientConfig::default().with_base_url("http://localhost:8000")?;
//! let mut controller = PredictionController::new(ApiClient::new(config)?);
//!
//! controller.set_text("Scientists confirm the bridge reopened after inspection on Monday.");
//! match controller.submit().await {
//!     RequestState::Success(result) => {
//!         println!("{} ({}%)", result.label, result.confidence_percent());
//!     }
//!     RequestState::Error(message) => eprintln!("Request failed: {}", message),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Overlapping submits
//!
//! [`PredictionController::begin_submit`] and [`PredictionController::complete`]
//! split a submit in two for event loops that keep several requests in flight.
//! Outcomes are applied in completion order, so the last one to complete wins.
//! Tickets issued before a `reset` or `fill_example` are ignored when they complete.

pub mod api_client;
pub mod controller;
mod runtime;

pub use api_client::{ApiClient, ApiError, ServiceLinks};
pub use controller::{
    HealthStatus, PendingPrediction, PredictError, PredictionBackend, PredictionController,
    PredictionResult, RequestState, ServiceMeta, TextStats, Verdict, EXAMPLE_TEXT, MIN_TEXT_CHARS,
};
pub use runtime::{create_http_client, ClientConfig, ConfigError, DEFAULT_API_BASE};

pub fn init_logger() {
    env_logger::init();
}
