use std::time::Duration;

/// Configures the client's connection to the analysis service.
///
/// Immutable after construction; owned by [`crate::AnalysisClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the analysis service, e.g. `https://analyzer.example.run`.
    pub base_url: String,
    /// Per-attempt request timeout. Each retry gets a fresh budget.
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(300),
        }
    }
}

/// Configures when the circuit breaker trips and how it recovers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Consecutive failed calls before the circuit opens. Values below 1
    /// are treated as 1.
    pub failure_threshold: u32,
    /// How long the circuit stays open before permitting a trial call.
    pub reset_timeout: Duration,
    /// Failures further apart than this do not accumulate: a failure
    /// arriving after a quiet period restarts the consecutive count at 1.
    pub monitoring_period: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(60),
            monitoring_period: Duration::from_secs(10),
        }
    }
}

/// Configures retry count and exponential backoff shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
    /// Growth factor between consecutive delays. Values below 1 are
    /// treated as 1, which gives flat backoff at `initial_delay`.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1_000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
        }
    }
}
