//! Glacier client configuration.

use crate::{
    error::{GlacierError, GlacierResult},
    transport::TransportConfig,
};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use url::Url;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Account id meaning "the account that owns the signing credentials".
pub const DEFAULT_ACCOUNT_ID: &str = "-";

/// Access key pair used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: SecretString,
}

impl Credentials {
    /// Create credentials from an access key id and secret key.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
        }
    }

    /// Access key id, sent in clear in the `authorization` header.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    #[must_use]
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Glacier client configuration.
#[derive(Debug, Clone)]
pub struct GlacierConfig {
    /// Region, e.g. `eu-west-1`
    pub region: String,
    /// Account id placed in every resource path
    pub account_id: String,
    /// Signing credentials
    pub credentials: Credentials,
    /// Base URL replacing `https://glacier.{region}.amazonaws.com`
    pub endpoint: Option<Url>,
    /// Settings for the built-in reqwest transport
    pub transport: TransportConfig,
}

impl GlacierConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            credentials: Credentials::new(access_key_id, secret_access_key),
            endpoint: None,
            transport: TransportConfig::default(),
        }
    }

    /// Load configuration from `AWS_REGION`, `AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, `GLACIER_ACCOUNT_ID` and `GLACIER_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a credential is missing or the endpoint is not a URL.
    pub fn from_env() -> GlacierResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from the same variables as [`GlacierConfig::from_env`],
    /// reading each one through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`GlacierConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GlacierResult<Self> {
        let region = lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let access_key_id = lookup("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| GlacierError::invalid_config("AWS_ACCESS_KEY_ID is not set"))?;
        let secret = lookup("AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| GlacierError::invalid_config("AWS_SECRET_ACCESS_KEY is not set"))?;

        let mut config = Self::new(region, access_key_id, secret);
        if let Some(account_id) = lookup("GLACIER_ACCOUNT_ID") {
            config = config.with_account_id(account_id);
        }
        if let Some(endpoint) = lookup("GLACIER_ENDPOINT") {
            config = config.with_endpoint(&endpoint)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the account id used in resource paths.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Send requests to `endpoint` instead of the regional service host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `endpoint` is not an absolute http(s) URL
    /// with a host, or carries a path, query or fragment. Resource paths are
    /// always rooted at `/{account_id}`.
    pub fn with_endpoint(mut self, endpoint: &str) -> GlacierResult<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| GlacierError::invalid_config(format!("endpoint {endpoint}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(GlacierError::invalid_config(format!(
                "endpoint {endpoint}: expected http(s) URL with a host"
            )));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(GlacierError::invalid_config(format!(
                "endpoint {endpoint}: path, query and fragment are not supported"
            )));
        }
        self.endpoint = Some(url);
        Ok(self)
    }

    /// Set the reqwest transport settings.
    #[must_use]
    pub fn with_transport_config(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Check that region, account id and credentials are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first empty or malformed field.
    pub fn validate(&self) -> GlacierResult<()> {
        let region_ok = !self.region.is_empty()
            && self
                .region
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !region_ok {
            return Err(GlacierError::invalid_config(format!(
                "invalid region: {:?}",
                self.region
            )));
        }
        if self.account_id.is_empty() {
            return Err(GlacierError::invalid_config("account id is empty"));
        }
        if self.credentials.access_key_id().is_empty() {
            return Err(GlacierError::invalid_config("access key id is empty"));
        }
        if self.credentials.secret_access_key().is_empty() {
            return Err(GlacierError::invalid_config("secret access key is empty"));
        }
        Ok(())
    }
}
