use std::sync::Arc;
use async_trait::async_trait;

use super::error::PredictError;
use super::state::PredictionResult;

/// Something that can classify a validated piece of text.
///
/// [`crate::ApiClient`] is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Sends exactly one prediction request for `text`, which is already trimmed.
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictError>;
}

#[async_trait]
impl<T: PredictionBackend + ?Sized> PredictionBackend for Arc<T> {
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        (**self).predict(text).await
    }
}
