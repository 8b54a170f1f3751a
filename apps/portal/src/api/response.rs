//! Response parsing. Reads each body exactly once and keeps both the raw
//! text and its JSON decoding, so callers can tell transport failure,
//! parse failure, and an application error payload apart.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    /// Mirrors the transport-level 2xx flag.
    pub ok: bool,
    pub status: u16,
    /// `None` when the body is not valid JSON.
    pub data: Option<Value>,
    pub text: String,
}

impl ParsedResponse {
    pub fn from_parts(status: u16, text: String) -> Self {
        let data = serde_json::from_str::<Value>(&text).ok();
        Self {
            ok: (200..300).contains(&status),
            status,
            data,
            text,
        }
    }

    /// Consumes a response. Never fails: an unreadable body yields empty text.
    pub async fn read(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read response body (status {status}): {e}");
                String::new()
            }
        };
        Self::from_parts(status, text)
    }

    /// The payload with a `{ "data": ... }` envelope stripped, if there is one.
    pub fn payload(&self) -> Option<&Value> {
        let data = self.data.as_ref()?;
        match data.get("data") {
            Some(inner) if !inner.is_null() => Some(inner),
            _ => Some(data),
        }
    }

    /// The message to surface for a failed call: the raw body, or the fallback when empty.
    pub fn failure_message(&self, fallback: &str) -> String {
        if self.text.trim().is_empty() {
            fallback.to_string()
        } else {
            self.text.clone()
        }
    }
}
