//! In-memory Glacier vault service.
//!
//! `FakeGlacier` implements `Transport`, so a `GlacierClient` can be pointed
//! at it directly. It keeps vaults in name order, pages lists the way Glacier
//! does (the marker is the ARN of the first vault of the next page), and
//! records every request it receives.

use crate::fixtures::{TEST_ACCOUNT, TEST_REGION, error_body, vault_arn};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use glacier_client::{GlacierRequest, GlacierResult, HttpMethod, RawResponse, Transport};
use serde_json::{Value, json};
use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct FakeState {
    vaults: BTreeMap<String, Value>,
    requests: Vec<GlacierRequest>,
    scripted: VecDeque<RawResponse>,
}

/// Fake Glacier service.
#[derive(Debug, Clone)]
pub struct FakeGlacier {
    region: String,
    account: String,
    state: Arc<Mutex<FakeState>>,
}

impl Default for FakeGlacier {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGlacier {
    /// Create an empty service in the fixture region.
    #[must_use]
    pub fn new() -> Self {
        Self::in_region(TEST_REGION)
    }

    /// Create an empty service that reports `region` in ARNs.
    #[must_use]
    pub fn in_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account: TEST_ACCOUNT.to_string(),
            state: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Add vaults directly, bypassing requests.
    pub async fn seed_vaults<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.state.lock().await;
        for name in names {
            let name = name.into();
            let description = self.describe(&name);
            state.vaults.insert(name, description);
        }
    }

    /// Answer the next request with `response` instead of simulating it.
    pub async fn respond_next_with(&self, response: RawResponse) {
        self.state.lock().await.scripted.push_back(response);
    }

    /// Names of the vaults currently stored.
    pub async fn vault_names(&self) -> Vec<String> {
        self.state.lock().await.vaults.keys().cloned().collect()
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<GlacierRequest> {
        self.state.lock().await.requests.clone()
    }

    /// The most recent request.
    pub async fn last_request(&self) -> Option<GlacierRequest> {
        self.state.lock().await.requests.last().cloned()
    }

    fn describe(&self, name: &str) -> Value {
        json!({
            "CreationDate": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "LastInventoryDate": null,
            "NumberOfArchives": 0,
            "SizeInBytes": 0,
            "VaultARN": vault_arn(&self.region, &self.account, name),
            "VaultName": name,
        })
    }

    fn list(&self, state: &FakeState, request: &GlacierRequest) -> RawResponse {
        let query: BTreeMap<&str, &str> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let limit = match query.get("limit").map(|l| l.parse::<usize>()) {
            None => 1000,
            Some(Ok(limit)) if (1..=1000).contains(&limit) => limit,
            Some(_) => return invalid_parameter("limit must be between 1 and 1000"),
        };

        let start = match query.get("marker") {
            None => None,
            Some(marker) => {
                let prefix = vault_arn(&self.region, &self.account, "");
                match marker.strip_prefix(&prefix) {
                    Some(name) if state.vaults.contains_key(name) => Some(name.to_string()),
                    _ => return invalid_parameter("invalid marker"),
                }
            }
        };

        let mut remaining = state
            .vaults
            .iter()
            .filter(|(name, _)| start.as_ref().is_none_or(|s| *name >= s))
            .map(|(_, description)| description.clone());

        let page: Vec<Value> = remaining.by_ref().take(limit).collect();
        let marker = remaining
            .next()
            .and_then(|next| next.get("VaultARN").cloned())
            .unwrap_or(Value::Null);

        json_response(200, &json!({ "Marker": marker, "VaultList": page }))
    }

    fn route(&self, state: &mut FakeState, request: &GlacierRequest) -> RawResponse {
        if request.header("authorization").is_none() {
            return json_response(
                403,
                &error_body(
                    "MissingAuthenticationTokenException",
                    "Missing Authentication Token",
                    "Client",
                ),
            );
        }

        let Some(rest) = request
            .path
            .strip_prefix('/')
            .and_then(|p| p.split_once("/vaults"))
            .map(|(_, rest)| rest)
        else {
            return not_found("Unknown resource");
        };

        match (request.method, rest.strip_prefix('/')) {
            (HttpMethod::Get, None) if rest.is_empty() => self.list(state, request),
            (HttpMethod::Put, Some(name)) => {
                if !state.vaults.contains_key(name) {
                    let description = self.describe(name);
                    state.vaults.insert(name.to_string(), description);
                }
                RawResponse::new(201, "").with_header(
                    "location",
                    format!("/{}/vaults/{name}", self.account),
                )
            }
            (HttpMethod::Delete, Some(name)) => match state.vaults.remove(name) {
                Some(_) => RawResponse::new(204, ""),
                None => self.vault_not_found(name),
            },
            (HttpMethod::Get, Some(name)) => match state.vaults.get(name) {
                Some(description) => json_response(200, description),
                None => self.vault_not_found(name),
            },
            _ => not_found("Unknown resource"),
        }
    }

    fn vault_not_found(&self, name: &str) -> RawResponse {
        not_found(&format!(
            "Vault not found for ARN: {}",
            vault_arn(&self.region, &self.account, name)
        ))
    }
}

#[async_trait]
impl Transport for FakeGlacier {
    async fn send(&self, request: &GlacierRequest) -> GlacierResult<RawResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(request.clone());

        let response = match state.scripted.pop_front() {
            Some(response) => response,
            None => self.route(&mut state, request),
        };
        Ok(response.with_header("x-amzn-requestid", Uuid::new_v4().to_string()))
    }
}

fn json_response(status: u16, body: &Value) -> RawResponse {
    RawResponse::new(status, body.to_string()).with_header("content-type", "application/json")
}

fn not_found(message: &str) -> RawResponse {
    json_response(
        404,
        &error_body("ResourceNotFoundException", message, "Client"),
    )
}

fn invalid_parameter(message: &str) -> RawResponse {
    json_response(
        400,
        &error_body("InvalidParameterValueException", message, "Client"),
    )
}
