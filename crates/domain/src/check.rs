//! Response checks and expectation helpers.
//!
//! Checks operate on `serde_json::Value` snapshots captured by setup steps.
//! Each helper returns `Err(CheckFailure)` carrying the expected and actual
//! values so the reporter can print a meaningful diff.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A failed expectation, carrying expected/actual values for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Human-readable failure message.
    pub message: String,
    /// Expected value, rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value, rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl CheckFailure {
    /// Creates a failure with a message only.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Creates a failure carrying expected and actual values.
    #[must_use]
    pub fn mismatch(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            expected: Some(expected.into()),
            actual: Some(actual.into()),
        }
    }
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Asserts that `actual` exists and structurally equals `expected`.
///
/// # Errors
///
/// Returns a `CheckFailure` with both values if they differ or `actual` is
/// missing.
pub fn expect_eq(what: &str, actual: Option<&Value>, expected: &Value) -> Result<(), CheckFailure> {
    match actual {
        Some(value) if value == expected => Ok(()),
        Some(value) => Err(CheckFailure::mismatch(
            format!("{what} mismatch"),
            expected.to_string(),
            value.to_string(),
        )),
        None => Err(CheckFailure::mismatch(
            format!("{what} is missing"),
            expected.to_string(),
            "<missing>",
        )),
    }
}

/// Asserts that `actual` exists and differs from `unexpected`.
///
/// # Errors
///
/// Returns a `CheckFailure` if the values are equal or `actual` is missing.
pub fn expect_ne(
    what: &str,
    actual: Option<&Value>,
    unexpected: &Value,
) -> Result<(), CheckFailure> {
    match actual {
        Some(value) if value != unexpected => Ok(()),
        Some(value) => Err(CheckFailure::mismatch(
            format!("{what} unexpectedly equals"),
            format!("anything but {unexpected}"),
            value.to_string(),
        )),
        None => Err(CheckFailure::new(format!("{what} is missing"))),
    }
}

/// Asserts that a value is present and not null.
///
/// # Errors
///
/// Returns a `CheckFailure` if the value is absent or null.
pub fn expect_exists(what: &str, actual: Option<&Value>) -> Result<(), CheckFailure> {
    match actual {
        Some(Value::Null) | None => Err(CheckFailure::new(format!("{what} does not exist"))),
        Some(_) => Ok(()),
    }
}

/// Asserts that `actual` contains at least the structure of `expected`.
///
/// # Errors
///
/// Returns a `CheckFailure` with both values if containment does not hold.
pub fn expect_subset(
    what: &str,
    actual: Option<&Value>,
    expected: &Value,
) -> Result<(), CheckFailure> {
    match actual {
        Some(value) if is_subset(value, expected) => Ok(()),
        Some(value) => Err(CheckFailure::mismatch(
            format!("{what} does not contain expected subset"),
            expected.to_string(),
            value.to_string(),
        )),
        None => Err(CheckFailure::mismatch(
            format!("{what} is missing"),
            expected.to_string(),
            "<missing>",
        )),
    }
}

/// Recursive structural containment: `actual` ⊇ `expected`.
///
/// Objects match when every expected key is present in `actual` and its value
/// is itself a subset. Arrays match when every expected element is a subset
/// of at least one actual element. Scalars match by equality.
#[must_use]
pub fn is_subset(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual_map), Value::Object(expected_map)) => expected_map
            .iter()
            .all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| is_subset(actual_value, expected_value))
            }),
        (Value::Array(actual_items), Value::Array(expected_items)) => expected_items
            .iter()
            .all(|expected_item| {
                actual_items
                    .iter()
                    .any(|actual_item| is_subset(actual_item, expected_item))
            }),
        _ => actual == expected,
    }
}
