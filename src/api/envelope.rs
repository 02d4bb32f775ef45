//! The `{ success, data, message }` envelope most endpoints wrap their payload in.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap a response body.
    ///
    /// An object with `success` or `data` is an envelope; anything else is taken
    /// as a bare payload. A missing `success` falls back to the HTTP verdict, and
    /// a non-2xx status is never a success.
    pub fn from_body(http_ok: bool, body: Value) -> Self {
        let is_envelope = body
            .as_object()
            .is_some_and(|o| o.contains_key("success") || o.contains_key("data"));

        if !is_envelope {
            let message = if http_ok { None } else { message_of(&body) };
            let data = match body {
                Value::Null => None,
                other => Some(other),
            };
            return Self {
                success: http_ok,
                data,
                message,
            };
        }

        let success = body.get("success").and_then(Value::as_bool).unwrap_or(http_ok) && http_ok;
        let message = message_of(&body);
        let data = body.get("data").filter(|v| !v.is_null()).cloned();

        Self {
            success,
            data,
            message,
        }
    }

    /// Human-readable failure text.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| "request was not successful".to_string())
    }
}

fn message_of(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(_) => ["message", "error", "detail"]
            .iter()
            .find_map(|k| body.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}
