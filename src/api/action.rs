//! Action requests sent to the gateway.

use serde_json::{Map, Value};

/// A single command for the gateway: an action code plus scalar parameters.
///
/// Built fresh for every call and consumed by [`crate::api::ApiClient::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    action: &'static str,
    params: Map<String, Value>,
    session: Option<String>,
}

impl ActionRequest {
    /// Create a request for `action` with no parameters.
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            params: Map::new(),
            session: None,
        }
    }

    /// Login (`us`): user email and the email hash.
    pub fn login(email: &str, email_hash: &str) -> Self {
        Self::new("us").param("user", email).param("uh", email_hash)
    }

    /// File listing (`f`).
    pub fn list_files() -> Self {
        Self::new("f").param("c", 1).param("r", 1)
    }

    /// Upload slot (`u`) for a body of `size` bytes.
    pub fn upload_slot(size: u64) -> Self {
        Self::new("u").param("s", size).param("ssl", 0)
    }

    /// Download URL (`g`) for `handle`.
    pub fn download_slot(handle: &str) -> Self {
        Self::new("g").param("g", 1).param("p", handle)
    }

    /// Delete (`d`) of `handle`.
    pub fn delete(handle: &str) -> Self {
        Self::new("d").param("n", handle)
    }

    /// Add a scalar parameter.
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Attach the session token sent with the request.
    pub fn with_session(mut self, token: Option<&str>) -> Self {
        self.session = token.map(str::to_string);
        self
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// JSON object for the request body (`{"a": action, ...params, "sid": token}`).
    pub fn to_json(&self) -> Value {
        let mut obj = Map::with_capacity(self.params.len() + 2);
        obj.insert("a".into(), Value::from(self.action));
        for (key, value) in &self.params {
            obj.insert(key.clone(), value.clone());
        }
        if let Some(sid) = &self.session {
            obj.insert("sid".into(), Value::from(sid.as_str()));
        }
        Value::Object(obj)
    }
}
