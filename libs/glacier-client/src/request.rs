//! Request descriptors and the builder that stamps the fixed headers.

use crate::{
    clock::format_amz_date,
    config::GlacierConfig,
    error::{GlacierError, GlacierResult},
};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::BTreeMap, fmt};
use url::Url;

/// Glacier REST API version sent with every request.
pub const API_VERSION: &str = "2012-06-01";

/// Service name used for the host and the signing scope.
pub const SERVICE_NAME: &str = "glacier";

/// Header carrying the API version.
pub const VERSION_HEADER: &str = "x-amz-glacier-version";

/// Header carrying the request timestamp.
pub const DATE_HEADER: &str = "date";

/// Host header.
pub const HOST_HEADER: &str = "host";

#[allow(clippy::unwrap_used)]
static VAULT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,255}$").unwrap());

/// Methods used by the vault operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read a vault or list vaults
    Get,
    /// Create a vault
    Put,
    /// Delete a vault
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A request ready to be signed and sent. Vault operations carry no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlacierRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// `https`, or the scheme of an endpoint override
    pub scheme: String,
    /// Host with optional `:port`
    pub host: String,
    /// Absolute path, e.g. `/-/vaults/photos`
    pub path: String,
    /// Query parameters in the order they were added
    pub query: Vec<(String, String)>,
    /// Headers keyed by lower-case name
    pub headers: BTreeMap<String, String>,
}

impl GlacierRequest {
    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Insert or replace a header. The name is stored lower-cased.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Query string with every key and value URI-encoded, in insertion order.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k, true), uri_encode(v, true)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Absolute URL of the request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if scheme, host and path do not form a URL.
    pub fn url(&self) -> GlacierResult<Url> {
        let mut url = Url::parse(&format!("{}://{}{}", self.scheme, self.host, self.path))
            .map_err(|e| GlacierError::invalid_input(format!("request URL: {e}")))?;
        if !self.query.is_empty() {
            url.set_query(Some(&self.query_string()));
        }
        Ok(url)
    }
}

/// Builds requests against one region and account.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    scheme: String,
    host: String,
    account_id: String,
}

impl RequestBuilder {
    /// Compute the target host from the configuration.
    #[must_use]
    pub fn new(config: &GlacierConfig) -> Self {
        let (scheme, host) = match &config.endpoint {
            Some(url) => {
                let host = url.host_str().unwrap_or_default();
                let host = match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                };
                (url.scheme().to_string(), host)
            }
            None => (
                "https".to_string(),
                format!("{SERVICE_NAME}.{}.amazonaws.com", config.region),
            ),
        };

        Self {
            scheme,
            host,
            account_id: config.account_id.clone(),
        }
    }

    /// Host every request is addressed to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path of the vault collection, `/{account}/vaults`.
    #[must_use]
    pub fn vaults_path(&self) -> String {
        format!("/{}/vaults", self.account_id)
    }

    /// Path of one vault, `/{account}/vaults/{name}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `name` is not a valid vault name.
    pub fn vault_path(&self, name: &str) -> GlacierResult<String> {
        validate_vault_name(name)?;
        Ok(format!("{}/{name}", self.vaults_path()))
    }

    /// Build a request stamped with the version, host and date headers.
    #[must_use]
    pub fn build(
        &self,
        method: HttpMethod,
        path: impl Into<String>,
        query: Vec<(String, String)>,
        now: DateTime<Utc>,
    ) -> GlacierRequest {
        let mut headers = BTreeMap::new();
        headers.insert(VERSION_HEADER.to_string(), API_VERSION.to_string());
        headers.insert(HOST_HEADER.to_string(), self.host.clone());
        headers.insert(DATE_HEADER.to_string(), format_amz_date(now));

        GlacierRequest {
            method,
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            path: path.into(),
            query,
            headers,
        }
    }
}

/// Check a vault name: 1 to 255 characters from `a-z`, `A-Z`, `0-9`, `_`, `-`, `.`.
/// `.` and `..` are rejected since they would be resolved as path segments.
///
/// # Errors
///
/// Returns `InvalidInput` describing the rejected name.
pub fn validate_vault_name(name: &str) -> GlacierResult<()> {
    if VAULT_NAME.is_match(name) && name != "." && name != ".." {
        Ok(())
    } else {
        Err(GlacierError::invalid_input(format!("invalid vault name: {name:?}")))
    }
}

/// Percent-encode everything except unreserved characters (`A-Z a-z 0-9 - _ . ~`).
/// `/` is kept when `encode_slash` is false.
#[must_use]
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn builder() -> RequestBuilder {
        RequestBuilder::new(&GlacierConfig::new("eu-west-1", "AKID", "secret"))
    }

    #[test]
    fn test_regional_host() {
        let builder = builder();
        assert_eq!(builder.host(), "glacier.eu-west-1.amazonaws.com");
    }

    #[test]
    fn test_endpoint_override_host() {
        let config = GlacierConfig::new("eu-west-1", "AKID", "secret")
            .with_endpoint("http://localhost:8080")
            .unwrap();
        let request = RequestBuilder::new(&config).build(
            HttpMethod::Get,
            "/-/vaults",
            Vec::new(),
            Utc::now(),
        );
        assert_eq!(request.header("Host"), Some("localhost:8080"));
        assert_eq!(request.url().unwrap().as_str(), "http://localhost:8080/-/vaults");
    }

    #[test]
    fn test_build_stamps_fixed_headers() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let request = builder().build(HttpMethod::Put, "/-/vaults/photos", Vec::new(), now);

        assert_eq!(request.header("x-amz-glacier-version"), Some("2012-06-01"));
        assert_eq!(request.header("Host"), Some("glacier.eu-west-1.amazonaws.com"));
        assert_eq!(request.header("Date"), Some("20240229T235959Z"));
        assert_eq!(
            request.url().unwrap().as_str(),
            "https://glacier.eu-west-1.amazonaws.com/-/vaults/photos"
        );
    }

    #[test]
    fn test_query_is_encoded() {
        let request = builder().build(
            HttpMethod::Get,
            "/-/vaults",
            vec![
                ("limit".to_string(), "2".to_string()),
                ("marker".to_string(), "arn:aws:glacier/a b+c".to_string()),
            ],
            Utc::now(),
        );
        assert_eq!(
            request.query_string(),
            "limit=2&marker=arn%3Aaws%3Aglacier%2Fa%20b%2Bc"
        );
        assert_eq!(
            request.url().unwrap().query(),
            Some("limit=2&marker=arn%3Aaws%3Aglacier%2Fa%20b%2Bc")
        );
    }

    #[test]
    fn test_vault_path() {
        let builder = builder();
        assert_eq!(builder.vaults_path(), "/-/vaults");
        assert_eq!(builder.vault_path("my.vault_1-a").unwrap(), "/-/vaults/my.vault_1-a");
        assert!(builder.vault_path("").is_err());
        assert!(builder.vault_path("has space").is_err());
        assert!(builder.vault_path("../etc").is_err());
        assert!(builder.vault_path("..").is_err());
        assert!(builder.vault_path(&"a".repeat(256)).is_err());
        assert!(builder.vault_path(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn test_explicit_account_id() {
        let config = GlacierConfig::new("us-east-1", "AKID", "secret").with_account_id("123456789012");
        assert_eq!(RequestBuilder::new(&config).vaults_path(), "/123456789012/vaults");
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("a-b_c.d~e", true), "a-b_c.d~e");
        assert_eq!(uri_encode("a/b", true), "a%2Fb");
        assert_eq!(uri_encode("a/b", false), "a/b");
        assert_eq!(uri_encode("é", true), "%C3%A9");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
