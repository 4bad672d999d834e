//! HubSpot credentials as handed out by the integration backend.
//!
//! The backend owns the token lifecycle; this crate only reads what it
//! returns. The body is kept verbatim so fields we don't know about survive.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque credentials object returned by `/get_hubspot_credentials`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Value);

impl Credentials {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The access token, if present as a string
    pub fn access_token(&self) -> Option<&str> {
        self.str_field("access_token")
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.str_field("refresh_token")
    }

    pub fn token_type(&self) -> Option<&str> {
        self.str_field("token_type")
    }

    /// Token lifetime in seconds, as reported when it was issued
    pub fn expires_in(&self) -> Option<u64> {
        self.0.get("expires_in").and_then(Value::as_u64)
    }

    /// True when the credentials are present and carry a truthy `access_token`
    pub fn is_authorized(&self) -> bool {
        self.0.get("access_token").is_some_and(is_truthy)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }
}

impl From<Value> for Credentials {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// JSON truthiness: null, false, 0 and "" are falsy, everything else is truthy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
