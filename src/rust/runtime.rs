use std::env;
use std::time::Duration;
use url::Url;

/// Root address of the hosted prediction service.
pub const DEFAULT_API_BASE: &str = "https://backend-hosting-fake-news-detection.vercel.app";

/// Environment variable overriding the base URL.
pub const API_BASE_ENV: &str = "VERITY_API_BASE";

/// Environment variable setting a request timeout in whole seconds.
pub const TIMEOUT_ENV: &str = "VERITY_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("Invalid timeout {0:?}: expected a whole number of seconds")]
    InvalidTimeout(String),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connection settings for the prediction service.
///
/// The base URL is carried here and handed to the client at construction time,
/// so nothing in the crate reads it from global state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// `None` leaves the transport's own default in place.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE).expect("default base URL is valid"),
            timeout: None,
            user_agent: format!("verity/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Builds a config from the defaults plus `VERITY_API_BASE` and `VERITY_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(base) = env::var(API_BASE_ENV) {
            log::info!("Using base URL from {}: {}", API_BASE_ENV, base);
            config = config.with_base_url(&base)?;
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Replaces the base URL. Only absolute http(s) URLs are accepted.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        let trimmed = base.trim();
        let mut url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url: trimmed.to_string(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        // Url::join drops the last path segment unless the base ends with a slash.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        self.base_url = url;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolves `path` (e.g. `"predict"` or `"/predict"`) against the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        let relative = path.trim_start_matches('/');
        match self.base_url.join(relative) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), relative),
        }
    }
}

/// Creates the shared HTTP client for the given configuration.
pub fn create_http_client(config: &ClientConfig) -> Result<reqwest::Client, ConfigError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    Ok(builder.build()?)
}
