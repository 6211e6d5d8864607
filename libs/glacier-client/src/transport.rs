//! One request in, one response out.

use crate::{
    error::GlacierResult,
    request::{API_VERSION, GlacierRequest, HOST_HEADER},
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::{collections::BTreeMap, time::Duration};
use tracing::debug;

/// Settings for the reqwest client behind [`ReqwestTransport`].
///
/// Each vault operation is a single call with no retry, so `timeout` bounds
/// the whole operation. Vault calls carry no body; the default leaves room
/// for slow regional endpoints, not for uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bound on one request, connect to last body byte (default: 60s)
    pub timeout: Duration,
    /// Bound on establishing the connection (default: 10s)
    pub connect_timeout: Duration,
    /// `user-agent` sent to Glacier
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!(
                "glacier-client/{} (api {API_VERSION})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl TransportConfig {
    /// Set the per-operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Status, headers and body of a response, kept whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Headers keyed by lower-case name
    pub headers: BTreeMap<String, String>,
    /// Raw body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends a signed request. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response, including non-2xx ones.
    ///
    /// # Errors
    ///
    /// Returns a transport error when no response was received.
    async fn send(&self, request: &GlacierRequest) -> GlacierResult<RawResponse>;
}

/// Transport backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build the transport and its rustls-backed HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be built.
    pub fn new(config: &TransportConfig) -> GlacierResult<Self> {
        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()?;
        Ok(Self { http })
    }

    /// Wrap an existing client.
    #[must_use]
    pub const fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &GlacierRequest) -> GlacierResult<RawResponse> {
        let url = request.url()?;
        debug!(method = %request.method, %url, "Sending Glacier request");

        let mut builder = self.http.request(request.method.into(), url);
        for (name, value) in &request.headers {
            // reqwest derives host from the URL
            if name != HOST_HEADER {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, body_len = body.len(), "Received Glacier response");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_raw_response_body_text() {
        let response = RawResponse::new(200, vec![b'o', b'k', 0xff]).with_header("X-Test", "1");
        assert_eq!(response.body_text(), "ok\u{fffd}");
        assert_eq!(response.headers.get("x-test").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_default_transport_config() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("glacier-client/"));
        assert!(config.user_agent.ends_with("(api 2012-06-01)"));
    }

    #[test]
    fn test_transport_config_builder() {
        let config = TransportConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(1))
            .with_user_agent("archiver/2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert_eq!(config.user_agent, "archiver/2");
    }

    #[test]
    fn test_transport_builds() {
        assert!(ReqwestTransport::new(&TransportConfig::default()).is_ok());
    }
}
