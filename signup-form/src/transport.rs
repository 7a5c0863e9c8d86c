//! Create-user transport
//!
//! [`RegistrationTransport`] is the seam between the submission session and
//! the network. [`HttpTransport`] is the real implementation: one JSON POST
//! per call, no retries, no client-side timeout.
//!
//! The request body carries the passwords, so the endpoint must be `https`.
//! Plain `http` is only accepted for loopback hosts, which lets tests and
//! local mock servers run without certificates.

use async_trait::async_trait;
use reqwest::Url;
use signup_common::{CreateUserResponse, RegistrationRecord};
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;

/// Transport errors
///
/// The session collapses every variant into the same Error status; the
/// distinction only matters for diagnostics.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {0}: {1}")]
    Status(u16, String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Refusing to send credentials over an unencrypted connection: {0}")]
    InsecureEndpoint(String),
}

/// Sends a registration record to the create-user endpoint
#[async_trait]
pub trait RegistrationTransport: Send + Sync {
    async fn create_user(
        &self,
        record: &RegistrationRecord,
    ) -> Result<CreateUserResponse, TransportError>;
}

#[async_trait]
impl<T> RegistrationTransport for Arc<T>
where
    T: RegistrationTransport + ?Sized,
{
    async fn create_user(
        &self,
        record: &RegistrationRecord,
    ) -> Result<CreateUserResponse, TransportError> {
        (**self).create_user(record).await
    }
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Build a transport for `endpoint`
    ///
    /// Fails if the URL does not parse or would send the record unencrypted
    /// to a non-loopback host.
    pub fn new(endpoint: &str, user_agent: &str) -> Result<Self, TransportError> {
        let endpoint = check_endpoint(endpoint)?;

        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RegistrationTransport for HttpTransport {
    async fn create_user(
        &self,
        record: &RegistrationRecord,
    ) -> Result<CreateUserResponse, TransportError> {
        // Never log the body: it holds both password fields.
        tracing::debug!(endpoint = %self.endpoint, "Posting registration");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(record)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status_code = status.as_u16(), "Create-user response received");

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransportError::Status(status.as_u16(), error_text));
        }

        response
            .json::<CreateUserResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Parse the endpoint and enforce an encrypted channel
pub fn check_endpoint(endpoint: &str) -> Result<Url, TransportError> {
    let url = Url::parse(endpoint)
        .map_err(|e| TransportError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;

    match url.scheme() {
        "https" => Ok(url),
        "http" if is_loopback(&url) => Ok(url),
        "http" => Err(TransportError::InsecureEndpoint(endpoint.to_string())),
        other => Err(TransportError::InvalidEndpoint(format!(
            "{}: unsupported scheme '{}'",
            endpoint, other
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    // IPv6 hosts come back bracketed
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .map(|addr| addr.is_loopback())
        .unwrap_or(false)
}
