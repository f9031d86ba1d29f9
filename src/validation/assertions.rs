//! Response assertions. Each returns `HarnessError::Assertion` on failure.

use std::time::Duration;

use http::StatusCode;
use serde_json::Value;

use crate::errors::HarnessError;
use crate::transport::ApiResponse;
use crate::validation::patterns;

pub fn assert_status_code(response: &ApiResponse, expected: u16) -> Result<(), HarnessError> {
    if response.status.as_u16() == expected {
        return Ok(());
    }
    Err(HarnessError::assertion(format!(
        "expected status {}, got {}. Body: {}",
        StatusCode::from_u16(expected).map_or(expected.to_string(), |s| s.to_string()),
        response.status,
        response.text
    )))
}

pub fn assert_has_fields(data: &Value, fields: &[&str]) -> Result<(), HarnessError> {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| data.get(field).is_none())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!("missing fields: {}", missing.join(", "))))
    }
}

/// Every field of `structure` must exist in `data` with the same JSON type.
/// Nested objects are compared recursively.
pub fn assert_response_structure(data: &Value, structure: &Value) -> Result<(), HarnessError> {
    compare_structure(data, structure, "")
}

fn compare_structure(data: &Value, structure: &Value, path: &str) -> Result<(), HarnessError> {
    let Value::Object(expected) = structure else {
        return Ok(());
    };
    for (key, expected_value) in expected {
        let field = if path.is_empty() { key.clone() } else { format!("{}.{}", path, key) };
        let actual = data
            .get(key)
            .ok_or_else(|| HarnessError::assertion(format!("missing field: {}", field)))?;
        if type_name(actual) != type_name(expected_value) {
            return Err(HarnessError::assertion(format!(
                "type mismatch for {}: expected {}, got {}",
                field,
                type_name(expected_value),
                type_name(actual)
            )));
        }
        compare_structure(actual, expected_value, &field)?;
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn assert_not_empty(data: &Value) -> Result<(), HarnessError> {
    let empty = match data {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        Err(HarnessError::assertion("expected a non-empty value"))
    } else {
        Ok(())
    }
}

/// Every top-level entry of `expected` must be present in `data` with an equal value.
pub fn assert_contains(data: &Value, expected: &Value) -> Result<(), HarnessError> {
    let Value::Object(expected) = expected else {
        return Err(HarnessError::assertion("expected value must be an object"));
    };
    for (key, value) in expected {
        match data.get(key) {
            Some(actual) if actual == value => {}
            Some(actual) => {
                return Err(HarnessError::assertion(format!(
                    "field {}: expected {}, got {}",
                    key, value, actual
                )))
            }
            None => return Err(HarnessError::assertion(format!("missing field: {}", key))),
        }
    }
    Ok(())
}

pub fn assert_valid_pagination(data: &Value) -> Result<(), HarnessError> {
    if patterns::is_paginated(data) {
        Ok(())
    } else {
        Err(HarnessError::assertion(
            "response is not paginated: expected data array and pagination {page, limit, total}",
        ))
    }
}

pub fn assert_error_response(data: &Value, expected_message: Option<&str>) -> Result<(), HarnessError> {
    if !patterns::is_error_response(data) {
        return Err(HarnessError::assertion(format!("not an error response: {}", data)));
    }
    let Some(expected_message) = expected_message else {
        return Ok(());
    };
    let message = match &data["error"] {
        Value::String(s) => s.as_str(),
        error => error.get("message").and_then(Value::as_str).unwrap_or_default(),
    };
    if message.contains(expected_message) {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "error message '{}' does not contain '{}'",
            message, expected_message
        )))
    }
}

/// Header present and, when `expected` is given, equal to it.
pub fn assert_header(response: &ApiResponse, name: &str, expected: Option<&str>) -> Result<(), HarnessError> {
    match (response.header(name), expected) {
        (None, _) => Err(HarnessError::assertion(format!("missing header: {}", name))),
        (Some(actual), Some(expected)) if actual != expected => Err(HarnessError::assertion(format!(
            "header {}: expected '{}', got '{}'",
            name, expected, actual
        ))),
        _ => Ok(()),
    }
}

pub fn assert_response_time(response: &ApiResponse, max: Duration) -> Result<(), HarnessError> {
    if response.elapsed <= max {
        Ok(())
    } else {
        Err(HarnessError::assertion(format!(
            "response took {:?}, limit {:?}",
            response.elapsed, max
        )))
    }
}
