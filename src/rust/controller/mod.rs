mod backend;
#[allow(clippy::module_inception)]
mod controller;
pub mod error;
mod state;
mod utils;

pub use backend::PredictionBackend;
pub use controller::{PendingPrediction, PredictionController, EXAMPLE_TEXT};
pub use error::PredictError;
pub use state::{HealthStatus, PredictionResult, RequestState, ServiceMeta, TextStats, Verdict};
pub use utils::MIN_TEXT_CHARS;
