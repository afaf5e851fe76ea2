//! Error classification at the transport boundary.
//!
//! Raw `reqwest` failures and non-success HTTP responses are mapped into
//! [`AnalyzerError`] exactly once, here; everything downstream branches on
//! [`ErrorKind`] instead of probing response shapes.

use reqwest::StatusCode;
use serde_json::Value as JsonValue;

use crate::{AnalyzerError, ErrorKind};

/// Classifies a non-success HTTP response.
///
/// The body is kept verbatim: if it parses as JSON it becomes `details`,
/// and an `error` or `message` string inside it becomes the message.
pub fn status(status: StatusCode, body: &str) -> AnalyzerError {
    let kind = kind_for_status(status);
    let details = serde_json::from_str::<JsonValue>(body).ok();
    let message = details
        .as_ref()
        .and_then(upstream_message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_owned()
            } else {
                body.to_owned()
            }
        });

    let mut err = AnalyzerError::new(kind, message).with_status(status.as_u16());
    if let Some(details) = details {
        err = err.with_details(details);
    }
    err
}

/// Classifies a request that never produced an HTTP response.
///
/// Timeouts and connection failures are retryable `Network` errors; a body
/// or decode failure after a successful exchange is `Unknown`.
pub fn transport(err: reqwest::Error) -> AnalyzerError {
    let kind = if err.is_timeout() || err.is_connect() || err.is_request() {
        ErrorKind::Network
    } else {
        ErrorKind::Unknown
    };
    AnalyzerError::new(kind, err.to_string())
}

/// Classifies a response body that failed JSON deserialization.
pub fn decode(err: serde_json::Error, body: &str) -> AnalyzerError {
    AnalyzerError::new(
        ErrorKind::Unknown,
        format!("invalid response JSON: {err}; body: {body}"),
    )
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Unprocessable,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimit,
        StatusCode::INTERNAL_SERVER_ERROR => ErrorKind::InternalServer,
        StatusCode::BAD_GATEWAY => ErrorKind::BadGateway,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::ServiceUnavailable,
        StatusCode::GATEWAY_TIMEOUT => ErrorKind::GatewayTimeout,
        _ => ErrorKind::Unknown,
    }
}

fn upstream_message(details: &JsonValue) -> Option<String> {
    details
        .get("error")
        .or_else(|| details.get("message"))
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
}
