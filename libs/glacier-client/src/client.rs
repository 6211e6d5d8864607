//! Glacier vault client.
//!
//! Every operation builds a request, stamps it with the current time,
//! signs it and sends it once. The `try_*` methods return tagged errors;
//! the plain methods collapse any failure into `false` / `None`.

use crate::{
    clock::{Clock, SystemClock},
    config::GlacierConfig,
    error::{GlacierError, GlacierResult},
    request::{HttpMethod, RequestBuilder, SERVICE_NAME},
    response::{Document, ensure_success, interpret},
    signer::{SigV4Signer, Signer, SigningScope},
    transport::{RawResponse, ReqwestTransport, Transport},
};
use tracing::{debug, info, instrument};

/// Default and maximum page size of `list_vaults`.
pub const DEFAULT_LIST_LIMIT: u32 = 1000;

/// Glacier client for vault lifecycle operations.
pub struct GlacierClient {
    config: GlacierConfig,
    builder: RequestBuilder,
    scope: SigningScope,
    transport: Box<dyn Transport>,
    signer: Box<dyn Signer>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for GlacierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlacierClient")
            .field("config", &self.config)
            .field("host", &self.builder.host())
            .finish_non_exhaustive()
    }
}

impl GlacierClient {
    /// Create a client for `region` using the given access key pair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for unusable settings, or `Transport` if the
    /// HTTP client cannot be built.
    pub fn new(
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> GlacierResult<Self> {
        Self::from_config(GlacierConfig::new(region, access_key_id, secret_access_key))
    }

    /// Create a client from a full configuration.
    ///
    /// # Errors
    ///
    /// Same as [`GlacierClient::new`].
    pub fn from_config(config: GlacierConfig) -> GlacierResult<Self> {
        let transport = ReqwestTransport::new(&config.transport)?;
        Self::with_transport(config, transport)
    }

    /// Create a client that sends through `transport`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for unusable settings.
    pub fn with_transport(
        config: GlacierConfig,
        transport: impl Transport + 'static,
    ) -> GlacierResult<Self> {
        config.validate()?;
        info!(region = %config.region, account_id = %config.account_id, "Creating Glacier client");

        Ok(Self {
            builder: RequestBuilder::new(&config),
            scope: SigningScope::new(config.region.clone(), SERVICE_NAME),
            config,
            transport: Box::new(transport),
            signer: Box::new(SigV4Signer::new()),
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the request signer.
    #[must_use]
    pub fn with_signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    /// Replace the time source used for request timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Configured region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Host requests are sent to.
    #[must_use]
    pub fn host(&self) -> &str {
        self.builder.host()
    }

    /// Create a vault. Returns `true` on success.
    pub async fn create_vault(&self, name: &str) -> bool {
        collapse("create_vault", self.try_create_vault(name).await).is_some()
    }

    /// Delete a vault. Returns `true` on success.
    pub async fn delete_vault(&self, name: &str) -> bool {
        collapse("delete_vault", self.try_delete_vault(name).await).is_some()
    }

    /// Describe a vault. Returns `None` on any failure.
    pub async fn describe_vault(&self, name: &str) -> Option<Document> {
        collapse("describe_vault", self.try_describe_vault(name).await)
    }

    /// List up to `limit` vaults starting after `marker`. Returns `None` on any failure.
    pub async fn list_vaults(&self, limit: u32, marker: Option<&str>) -> Option<Document> {
        collapse("list_vaults", self.try_list_vaults(limit, marker).await)
    }

    /// Create a vault, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name, otherwise any transport, signing or service error.
    #[instrument(skip(self))]
    pub async fn try_create_vault(&self, name: &str) -> GlacierResult<()> {
        let path = self.builder.vault_path(name)?;
        ensure_success(self.dispatch(HttpMethod::Put, path, Vec::new()).await?)?;
        info!(vault = name, "Vault created");
        Ok(())
    }

    /// Delete a vault, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name, otherwise any transport, signing or service error.
    #[instrument(skip(self))]
    pub async fn try_delete_vault(&self, name: &str) -> GlacierResult<()> {
        let path = self.builder.vault_path(name)?;
        ensure_success(self.dispatch(HttpMethod::Delete, path, Vec::new()).await?)?;
        info!(vault = name, "Vault deleted");
        Ok(())
    }

    /// Describe a vault, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad name, `Decode` for a malformed body,
    /// otherwise any transport, signing or service error.
    #[instrument(skip(self))]
    pub async fn try_describe_vault(&self, name: &str) -> GlacierResult<Document> {
        let path = self.builder.vault_path(name)?;
        interpret(self.dispatch(HttpMethod::Get, path, Vec::new()).await?)
    }

    /// List vaults, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `limit` is outside `1..=1000`, `Decode` for a
    /// malformed body, otherwise any transport, signing or service error.
    #[instrument(skip(self))]
    pub async fn try_list_vaults(&self, limit: u32, marker: Option<&str>) -> GlacierResult<Document> {
        if !(1..=DEFAULT_LIST_LIMIT).contains(&limit) {
            return Err(GlacierError::invalid_input(format!(
                "limit must be between 1 and {DEFAULT_LIST_LIMIT}, got {limit}"
            )));
        }

        let mut query = vec![("limit".to_string(), limit.to_string())];
        if let Some(marker) = marker {
            query.push(("marker".to_string(), marker.to_string()));
        }

        let path = self.builder.vaults_path();
        interpret(self.dispatch(HttpMethod::Get, path, query).await?)
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        path: String,
        query: Vec<(String, String)>,
    ) -> GlacierResult<RawResponse> {
        let request = self.builder.build(method, path, query, self.clock.now());
        let request = self
            .signer
            .sign(request, &self.scope, &self.config.credentials)?;

        debug!(method = %request.method, path = %request.path, "Dispatching signed request");
        self.transport.send(&request).await
    }
}

// Service errors were already logged at warn by `ensure_success`.
fn collapse<T>(operation: &str, result: GlacierResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(operation, error = %e, "Glacier operation failed");
            None
        }
    }
}
