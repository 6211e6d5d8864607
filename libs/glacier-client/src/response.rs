//! Turning raw responses into documents or tagged errors.

use crate::{
    error::{GlacierError, GlacierResult},
    transport::RawResponse,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Generic JSON object returned by describe and list.
pub type Document = Map<String, Value>;

/// Error document Glacier sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Pass 2xx responses through; turn anything else into `Service` after logging it.
///
/// # Errors
///
/// Returns `Service` with the status, the parsed error code and message, and the raw body.
pub fn ensure_success(response: RawResponse) -> GlacierResult<RawResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let body = response.body_text();
    let parsed = serde_json::from_slice::<ServiceErrorBody>(&response.body).ok();
    let (code, message) = parsed.map_or((None, None), |p| (p.code, p.message));

    warn!(
        status = response.status,
        code = code.as_deref().unwrap_or("-"),
        body = %body,
        "Glacier request failed"
    );

    Err(GlacierError::Service {
        status: response.status,
        code,
        message,
        body,
    })
}

/// Decode a response body as a JSON object.
///
/// # Errors
///
/// Returns `Decode` if the body is not JSON or not an object.
pub fn decode_document(response: &RawResponse) -> GlacierResult<Document> {
    match serde_json::from_slice::<Value>(&response.body)? {
        Value::Object(document) => Ok(document),
        other => Err(GlacierError::Decode(serde::de::Error::custom(format!(
            "expected a JSON object, got {}",
            value_kind(&other)
        )))),
    }
}

/// Check the status, then decode the body.
///
/// # Errors
///
/// Returns `Service` for non-2xx statuses and `Decode` for malformed bodies.
pub fn interpret(response: RawResponse) -> GlacierResult<Document> {
    let response = ensure_success(response)?;
    decode_document(&response)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Accessors for a list-vaults document.
pub trait ListVaultsPage {
    /// Names of the vaults on this page.
    fn vault_names(&self) -> Vec<&str>;

    /// Marker for the next page, `None` on the last page.
    fn next_marker(&self) -> Option<&str>;
}

impl ListVaultsPage for Document {
    fn vault_names(&self) -> Vec<&str> {
        self.get("VaultList")
            .and_then(Value::as_array)
            .map(|vaults| {
                vaults
                    .iter()
                    .filter_map(|v| v.get("VaultName").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn next_marker(&self) -> Option<&str> {
        self.get("Marker").and_then(Value::as_str)
    }
}
