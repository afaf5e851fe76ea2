use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    breaker::CircuitBreaker, retry, transport::Transport, AnalysisRequest, AnalysisResult,
    CircuitBreakerConfig, CircuitState, ClientConfig, DocumentClassification, HealthStatus,
    Result, RetryConfig, StaticTokenProvider, TokenProvider,
};

/// Resilient client for the remote document-analysis service.
///
/// Every operation runs through the same pipeline: circuit breaker →
/// retry executor → authenticated transport. The breaker settles once per
/// top-level call, after retries succeeded or exhausted their budget.
///
/// Cloning is cheap and clones share the circuit-breaker state, so all
/// handles in a process observe the same view of backend health.
#[derive(Clone)]
pub struct AnalysisClient {
    transport: Transport,
    breaker: CircuitBreaker,
    retry: RetryConfig,
}

impl fmt::Debug for AnalysisClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisClient")
            .field("transport", &self.transport)
            .field("retry", &self.retry)
            .field("breaker_state", &self.breaker.state())
            .finish()
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    document_content: &'a str,
    metadata: &'a JsonValue,
}

impl AnalysisClient {
    /// Creates a client with default breaker, retry, and timeout settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use analyzer_http::{AnalysisClient, StaticTokenProvider};
    ///
    /// let client = AnalysisClient::new(
    ///     "https://analyzer.example.run",
    ///     Arc::new(StaticTokenProvider::new("my-token")),
    /// );
    /// ```
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            transport: Transport::new(ClientConfig::new(base_url), tokens),
            breaker: CircuitBreaker::new(CircuitBreakerConfig::default()),
            retry: RetryConfig::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `ANALYZER_SERVICE_URL` — base URL of the analysis service
    /// - `ANALYZER_TOKEN` — bearer token (prefix optional)
    ///
    /// Returns an error if either variable is missing or empty. Intended
    /// for deployments where the token is issued out of band; inject a
    /// custom [`TokenProvider`] via [`AnalysisClient::new`] otherwise.
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("ANALYZER_SERVICE_URL")
            .map_err(|_| "missing ANALYZER_SERVICE_URL environment variable".to_owned())?;
        let token = std::env::var("ANALYZER_TOKEN")
            .map_err(|_| "missing ANALYZER_TOKEN environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("ANALYZER_SERVICE_URL is set but empty".to_owned());
        }
        if token.trim().is_empty() {
            return Err("ANALYZER_TOKEN is set but empty".to_owned());
        }
        Ok(Self::new(url, Arc::new(StaticTokenProvider::new(token))))
    }

    /// Replaces the per-attempt request timeout (default 300 s).
    ///
    /// Each retry gets a fresh timeout budget; a caller wanting an overall
    /// deadline should impose it externally by dropping the call future.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.transport.set_request_timeout(timeout);
        self
    }

    /// Replaces the circuit-breaker configuration, resetting its state.
    pub fn with_circuit_breaker(mut self, config: CircuitBreakerConfig) -> Self {
        self.breaker = CircuitBreaker::new(config);
        self
    }

    /// Replaces the retry configuration.
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Submits a document for analysis via `POST /analyze`.
    ///
    /// The result is returned exactly as the service produced it — no
    /// re-scoring, no validation beyond structural deserialization.
    pub async fn analyze_document(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.guarded(|| self.transport.post_json("/analyze", request))
            .await
    }

    /// Classifies a document via `POST /classify`.
    pub async fn classify_document(
        &self,
        document_content: &str,
        metadata: &JsonValue,
    ) -> Result<DocumentClassification> {
        let body = ClassifyRequest {
            document_content,
            metadata,
        };
        self.guarded(|| self.transport.post_json("/classify", &body))
            .await
    }

    /// Checks service health via `GET /health`.
    ///
    /// Follows the same breaker/retry pipeline as
    /// [`AnalysisClient::analyze_document`] — a health probe against a
    /// tripped circuit fails fast instead of hammering the backend.
    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.guarded(|| self.transport.get_json("/health")).await
    }

    /// Fetches service metrics via `GET /metrics`.
    pub async fn metrics(&self) -> Result<JsonValue> {
        self.guarded(|| self.transport.get_json("/metrics")).await
    }

    /// Whether the service currently reports itself healthy.
    pub async fn is_available(&self) -> bool {
        self.health_check()
            .await
            .map(|health| health.is_healthy())
            .unwrap_or(false)
    }

    /// Current circuit-breaker state, for observability.
    pub fn breaker_state(&self) -> CircuitState {
        self.breaker.state()
    }

    /// Current consecutive-failure count, for observability.
    pub fn breaker_failure_count(&self) -> u32 {
        self.breaker.failure_count()
    }

    /// Shared pipeline: breaker gate, retried operation, one settlement.
    async fn guarded<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let permit = self.breaker.before_call()?;
        match retry::execute(&self.retry, op).await {
            Ok(result) => {
                permit.success();
                Ok(result)
            }
            Err(err) => {
                permit.failure();
                Err(err)
            }
        }
    }
}
