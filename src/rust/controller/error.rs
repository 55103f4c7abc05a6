use reqwest::StatusCode;

/// Message shown when the input is too short to classify.
pub const VALIDATION_MESSAGE: &str = "Enter at least 10 characters.";

/// Fallback for server failures that carry no usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str = "Prediction failed.";

/// Fallback for transport failures that carry no message at all.
pub const UNKNOWN_FAILURE_MESSAGE: &str = "Something went wrong.";

/// Signature reported when no connection to the service could be made.
pub const FETCH_FAILED: &str = "Failed to fetch";

/// Hint shown in place of [`FETCH_FAILED`].
pub const FETCH_FAILED_HINT: &str =
    "Failed to reach backend. This is usually CORS or backend downtime.";

/// The ways a single prediction attempt can fail.
///
/// Every variant is terminal for the attempt and recoverable by submitting again.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// Input rejected locally; the network was never touched.
    #[error("Validation error: {}", VALIDATION_MESSAGE)]
    Validation,
    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("Server error ({status}): {}", .detail.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Server {
        status: StatusCode,
        detail: Option<String>,
    },
    /// The response body could not be read as the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PredictError {
    /// The text a user should see for this failure.
    pub fn display_message(&self) -> String {
        match self {
            Self::Validation => VALIDATION_MESSAGE.to_string(),
            Self::Transport(msg) => transport_message(msg),
            Self::Server { detail, .. } => detail
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(GENERIC_FAILURE_MESSAGE)
                .to_string(),
            Self::Parse(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Maps a raw transport failure message to what gets displayed.
pub fn transport_message(raw: &str) -> String {
    if raw == FETCH_FAILED {
        FETCH_FAILED_HINT.to_string()
    } else if raw.is_empty() {
        UNKNOWN_FAILURE_MESSAGE.to_string()
    } else {
        raw.to_string()
    }
}
