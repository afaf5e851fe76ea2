use std::fmt;

use serde_json::Value as JsonValue;

/// Closed set of failure categories produced by classification.
///
/// Every error leaving this crate carries exactly one kind, so callers can
/// branch on a tagged variant instead of re-inspecting raw transport shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 400 — the analysis request was rejected as malformed.
    Validation,
    /// HTTP 401, or the credential provider failed to produce a token.
    Authentication,
    /// HTTP 403.
    Authorization,
    /// HTTP 404.
    NotFound,
    /// HTTP 422 — the document could not be processed.
    Unprocessable,
    /// HTTP 429.
    RateLimit,
    /// HTTP 500.
    InternalServer,
    /// HTTP 502.
    BadGateway,
    /// HTTP 503.
    ServiceUnavailable,
    /// HTTP 504.
    GatewayTimeout,
    /// Connection-level failure: reset, timeout, no HTTP status at all.
    Network,
    /// The circuit breaker rejected the call without attempting it.
    /// Callers should fall back or wait; the backend was never contacted.
    CircuitOpen,
    /// Anything unrecognized, including undecodable response bodies.
    Unknown,
}

impl ErrorKind {
    /// Whether a failure of this kind is worth retrying within the same call.
    ///
    /// Transient server-side and connection-level failures retry; client
    /// errors and auth failures do not, and unknown failures fail safe.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimit
                | ErrorKind::InternalServer
                | ErrorKind::BadGateway
                | ErrorKind::ServiceUnavailable
                | ErrorKind::GatewayTimeout
                | ErrorKind::Network
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation error",
            ErrorKind::Authentication => "authentication error",
            ErrorKind::Authorization => "authorization error",
            ErrorKind::NotFound => "not found",
            ErrorKind::Unprocessable => "unprocessable request",
            ErrorKind::RateLimit => "rate limit exceeded",
            ErrorKind::InternalServer => "internal server error",
            ErrorKind::BadGateway => "bad gateway",
            ErrorKind::ServiceUnavailable => "service unavailable",
            ErrorKind::GatewayTimeout => "gateway timeout",
            ErrorKind::Network => "network error",
            ErrorKind::CircuitOpen => "circuit breaker open",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(name)
    }
}

/// Error type returned by this crate.
///
/// Classification is additive: the upstream message, HTTP status, and any
/// structured response body survive in `message`/`http_status`/`details`.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AnalyzerError {
    /// Failure category; the only field downstream code should branch on.
    pub kind: ErrorKind,
    /// HTTP status of the failing response, if one was received.
    pub http_status: Option<u16>,
    /// Human-readable message from upstream, or a transport description.
    pub message: String,
    /// Structured error payload from the response body, if it parsed as JSON.
    pub details: Option<JsonValue>,
}

impl AnalyzerError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: None,
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub(crate) fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }

    /// Builds the error returned when the breaker rejects a call outright.
    pub(crate) fn circuit_open() -> Self {
        Self::new(
            ErrorKind::CircuitOpen,
            "circuit breaker is open; analysis service assumed unavailable",
        )
    }

    /// Builds the terminal error for a credential-provider failure.
    pub(crate) fn token_acquisition(source: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Authentication,
            format!("failed to obtain bearer token: {source}"),
        )
    }

    /// Whether the retry executor may attempt this call again.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
