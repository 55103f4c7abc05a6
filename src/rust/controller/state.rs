use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The binary class returned by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verdict {
    Reliable = 0,
    Unreliable = 1,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Reliable => "Reliable",
            Self::Unreliable => "Unreliable",
        }
    }

    pub fn class_id(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Verdict {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Reliable),
            1 => Ok(Self::Unreliable),
            other => Err(format!("unknown prediction class {}", other)),
        }
    }
}

impl From<Verdict> for u8 {
    fn from(verdict: Verdict) -> Self {
        verdict.class_id()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A complete answer from `POST /predict`.
///
/// Only ever built by deserializing a whole response body, so a value of this
/// type is never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub prediction: Verdict,
    /// Probability of `prediction`, in `0.0..=1.0`.
    pub confidence: f64,
    /// Server-side inference latency in milliseconds.
    pub ms: u64,
}

impl PredictionResult {
    /// Confidence as a whole percentage, e.g. `0.87` becomes `87`.
    pub fn confidence_percent(&self) -> u8 {
        let pct = (self.confidence * 100.0).round();
        if pct.is_nan() {
            0
        } else {
            pct.clamp(0.0, 100.0) as u8
        }
    }
}

/// Display state of the controller. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(PredictionResult),
    Error(String),
}

impl RequestState {
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Character and word counts for the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub chars: usize,
    pub words: usize,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}

/// Body of `GET /meta`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceMeta {
    pub model: String,
    pub vectorizer: String,
    /// Class id (as a string key) to label.
    #[serde(default)]
    pub labels: HashMap<String, String>,
}
