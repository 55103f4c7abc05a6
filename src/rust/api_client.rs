use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::controller::error::FETCH_FAILED;
use crate::controller::{
    HealthStatus, PredictError, PredictionBackend, PredictionResult, ServiceMeta,
};
use crate::runtime::{create_http_client, ClientConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(StatusCode),
}

/// Informational pages of the service. These are for a person to open; the
/// client never fetches `docs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLinks {
    pub docs: String,
    pub health: String,
    pub meta: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = create_http_client(&config)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn links(&self) -> ServiceLinks {
        ServiceLinks {
            docs: self.config.endpoint("docs"),
            health: self.config.endpoint("health"),
            meta: self.config.endpoint("meta"),
        }
    }

    /// Sends `POST /predict` with `{"text": text}`.
    ///
    /// `text` is sent as given; trimming and length checks belong to the caller.
    pub async fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        let url = self.config.endpoint("predict");
        log::info!("Requesting prediction from {}", url);
        log::debug!("Request text: {} chars", text.chars().count());

        let response = self
            .http
            .post(&url)
            .json(&PredictRequest { text })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        log::info!("Prediction response status: {}", status);

        // An unreadable body is handled like an unparsable one.
        let body = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read response body: {}", e);
                Default::default()
            }
        };

        if !status.is_success() {
            let detail = error_detail(&body);
            log::error!("Prediction failed with {}: {:?}", status, detail);
            return Err(PredictError::Server { status, detail });
        }

        serde_json::from_slice::<PredictionResult>(&body).map_err(|e| {
            log::error!("Invalid prediction payload: {}", e);
            PredictError::Parse(e.to_string())
        })
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("health").await
    }

    /// `GET /meta`: model and vectorizer names plus the label table.
    pub async fn meta(&self) -> Result<ServiceMeta, ApiError> {
        self.get_json("meta").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        log::info!("Fetching {}", url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("{} returned {}", url, status);
            return Err(ApiError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PredictionBackend for ApiClient {
    async fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        ApiClient::predict(self, text).await
    }
}

/// Connection failures collapse to the fetch-failed signature; timeouts say so
/// up front. Everything else keeps reqwest's message plus its causes.
fn transport_error(err: reqwest::Error) -> PredictError {
    log::error!("Prediction request failed: {}", err);
    if err.is_connect() {
        PredictError::Transport(FETCH_FAILED.to_string())
    } else if err.is_timeout() {
        PredictError::Transport(format!("Request timed out: {}", error_chain(&err)))
    } else {
        PredictError::Transport(error_chain(&err))
    }
}

/// Joins an error with every `source()` below it, e.g.
/// `error sending request for url (..): operation timed out`.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

/// Pulls a displayable `detail` out of an error body.
///
/// Accepts a plain string or a list of validation entries carrying `msg`.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.is_empty() => Some(detail.clone()),
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
