//! DataFetcher - professor lookup against the review service
//!
//! The actual HTTP call sits behind `Transport` so the browser build can use
//! `fetch()` + `AbortController` while tests feed canned responses.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use super::outcome::{classify, Outcome, RawResponse, TransportError};
use super::record::ServiceHealth;

/// One GET with a hard time budget.
///
/// Implementations must map their own deadline to `TransportError::TimedOut`
/// and connection-level failures to `TransportError::Network`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str, timeout_ms: u32) -> Result<RawResponse, TransportError>;
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// `{base}/professor?name=<encoded>`
pub fn professor_url(base_url: &str, name: &str) -> String {
    format!(
        "{}/professor?name={}",
        base_url.trim_end_matches('/'),
        encode_component(name.trim())
    )
}

pub fn health_url(base_url: &str) -> String {
    format!("{}/health", base_url.trim_end_matches('/'))
}

/// Review-service client
pub struct DataFetcher<T> {
    transport: T,
    base_url: String,
    timeout_ms: u32,
}

impl<T: Transport> DataFetcher<T> {
    /// `base_url` should be like `http://localhost:8000` (trailing slash is trimmed).
    pub fn new(transport: T, base_url: &str, timeout_ms: u32) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Look up `name`. Never fails: every path lands on an `Outcome`.
    pub async fn fetch(&self, name: &str) -> Outcome {
        let url = professor_url(&self.base_url, name);
        let result = self.transport.get(&url, self.timeout_ms).await;

        if let Err(e) = &result {
            console_warn!("[DataFetcher] {} failed: {}", url, e);
        }
        let mut outcome = classify(result);
        if let Outcome::Success(record) = &mut outcome {
            if record.name.trim().is_empty() {
                record.name = name.trim().to_string();
            }
        }
        console_log!("[DataFetcher] {:?} -> {}", name, outcome.label());
        outcome
    }

    /// Probe `GET /health`.
    pub async fn check_health(&self) -> Result<ServiceHealth, String> {
        let url = health_url(&self.base_url);
        let response = self
            .transport
            .get(&url, self.timeout_ms)
            .await
            .map_err(|e| e.to_string())?;
        if !response.is_success() {
            return Err(format!("health check returned HTTP {}", response.status));
        }
        serde_json::from_str(&response.body).map_err(|e| format!("invalid health body: {}", e))
    }
}
