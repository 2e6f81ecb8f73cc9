//! Suite definitions and shared helpers.

pub mod echo;
pub mod github;

use serde_json::{Value, json};
use sonda_application::{SetupError, Vars};
use sonda_domain::CapturedResponse;

/// Captures the standard response variables: `status`, `headers`, `body`.
///
/// Header keys are lowercased so checks can address them with JSON pointers.
fn response_vars(response: &CapturedResponse) -> Vars {
    let headers: serde_json::Map<String, Value> = response
        .headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), Value::String(v.clone())))
        .collect();

    let mut vars = Vars::new();
    vars.insert("status".to_string(), json!(response.status));
    vars.insert("headers".to_string(), Value::Object(headers));
    vars.insert("body".to_string(), response.json_or_empty());
    vars
}

/// Extracts a string field from a captured value, failing setup when absent.
fn string_at(value: &Value, pointer: &str, what: &str) -> Result<String, SetupError> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| SetupError::MissingVar(what.to_string()))
}

/// Finds the element of a JSON array whose `name` field matches.
fn find_by_name(items: &Value, name: &str) -> Option<Value> {
    items.as_array()?.iter().find(|item| {
        item.get("name").and_then(Value::as_str) == Some(name)
    }).cloned()
}

/// Hex-encoded md5 digest, used for content-addressing downloads.
fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
