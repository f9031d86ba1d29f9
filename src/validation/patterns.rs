//! Shape checks for common response envelopes.

use serde_json::Value;

/// `{ data: [...], pagination: { page, limit, total, ... } }`
pub fn is_paginated(data: &Value) -> bool {
    data.get("data").is_some_and(Value::is_array)
        && data.get("pagination").is_some_and(|p| {
            ["page", "limit", "total"]
                .iter()
                .all(|field| p.get(field).is_some_and(Value::is_number))
        })
}

/// `{ error: { message, code? } }` or `{ error: "message" }`
pub fn is_error_response(data: &Value) -> bool {
    match data.get("error") {
        Some(Value::String(_)) => true,
        Some(Value::Object(error)) => error.get("message").is_some_and(Value::is_string),
        _ => false,
    }
}

/// `{ success: true, data? }`
pub fn is_success_response(data: &Value) -> bool {
    data.get("success").and_then(Value::as_bool) == Some(true)
}
