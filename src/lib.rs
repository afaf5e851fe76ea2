//! `analyzer-http` is a resilient async HTTP client for the remote
//! document-analysis service.
//!
//! The crate wraps the `/analyze` and `/health` endpoints with a fixed
//! pipeline — circuit breaker → retry with exponential backoff →
//! authenticated transport — and a stable error taxonomy:
//! - [`AnalysisClient::analyze_document`]
//! - [`AnalysisClient::health_check`]
//! - [`AnalysisClient::classify_document`]
//!
//! Failures surface as [`AnalyzerError`] with a closed [`ErrorKind`] set,
//! so callers can distinguish a rejected call ([`ErrorKind::CircuitOpen`])
//! from a genuine backend failure and implement fallbacks.

mod backoff;
mod breaker;
mod classify;
mod client;
mod config;
mod error;
mod retry;
mod transport;
mod types;

pub use breaker::{CallPermit, CircuitBreaker, CircuitState};
pub use client::AnalysisClient;
pub use config::{CircuitBreakerConfig, ClientConfig, RetryConfig};
pub use error::{AnalyzerError, ErrorKind};
pub use transport::{BoxError, StaticTokenProvider, TokenProvider};
pub use types::{
    AnalysisFindings, AnalysisRequest, AnalysisResult, AnalysisStatus, DocumentClassification,
    HealthStatus, RequestMetadata,
};

pub type Result<T> = std::result::Result<T, AnalyzerError>;
