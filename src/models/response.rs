//! Shortcut response model.
//!
//! A response is a terminal value: any HTTP response the server produced,
//! including 4xx/5xx statuses. Interpreting non-2xx statuses is left to the
//! caller; the engine never turns them into failures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An HTTP response received for an executed shortcut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Human-readable status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers as key-value pairs.
    pub headers: HashMap<String, String>,

    /// Response body as raw bytes. `Vec<u8>` rather than `String` so binary
    /// responses survive unchanged.
    pub body: Vec<u8>,
}

impl ShortcutResponse {
    /// Creates a new response with the given status and empty headers/body.
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Whether the status is in the 4xx range.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Whether the status is in the 5xx range.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Gets the Content-Type header value if present.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Attempts to decode the body as UTF-8 text.
    pub fn body_as_string(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }
}
