//! Authenticated HTTP transport.
//!
//! Every outbound attempt obtains a bearer token from the injected
//! [`TokenProvider`], attaches it as an `Authorization` header, and runs
//! under the per-attempt request timeout. Failures leave this module
//! already classified.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use serde::{de::DeserializeOwned, Serialize};

use crate::{classify, AnalyzerError, ClientConfig};

/// Boxed error for the credential-provider boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces a short-lived bearer token on demand.
///
/// Injected into the client at construction — there is no hidden global
/// credential state. A provider failure is terminal for the current call:
/// it surfaces as a non-retryable authentication error, since retrying the
/// backend will not fix a credential outage.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, with or without the `Bearer `
    /// prefix (the transport normalizes it).
    async fn bearer_token(&self) -> Result<String, BoxError>;
}

/// Token provider backed by a fixed token, for service-to-service setups
/// where the credential is issued out of band.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, BoxError> {
        Ok(self.token.clone())
    }
}

/// JSON transport bound to the analysis service base URL.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.config.base_url)
            .field("request_timeout", &self.config.request_timeout)
            .finish()
    }
}

impl Transport {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens,
        }
    }

    pub(crate) fn set_request_timeout(&mut self, timeout: std::time::Duration) {
        self.config.request_timeout = timeout;
    }

    /// Sends `GET <base_url><path>` and decodes the JSON response.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, AnalyzerError> {
        self.send(self.http.get(self.url(path))).await
    }

    /// Sends `POST <base_url><path>` with a JSON body and decodes the
    /// JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, AnalyzerError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, AnalyzerError> {
        let token = self
            .tokens
            .bearer_token()
            .await
            .map_err(AnalyzerError::token_acquisition)?;

        let response = request
            .header(
                header::AUTHORIZATION,
                normalize_bearer_authorization(&token),
            )
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(classify::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(classify::transport)?;

        if !status.is_success() {
            return Err(classify::status(status, &body));
        }

        serde_json::from_str::<R>(&body).map_err(|err| classify::decode(err, &body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

fn normalize_bearer_authorization(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
