use thiserror::Error;

/// Client-level error type.
/// Every view action catches this at its boundary and turns it into a notice.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortalError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        PortalError::Rejected(msg.into())
    }

    /// The text shown to the user for this failure.
    ///
    /// Application errors carry the backend's raw body (or the caller's
    /// fallback) verbatim. Transport and decode failures collapse into a
    /// generic message; the detail goes to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::Api { message, .. } => message.clone(),
            PortalError::Rejected(msg) => msg.clone(),
            PortalError::Transport(e) => {
                tracing::error!("Transport error: {e}");
                "Network error, please try again".to_string()
            }
            PortalError::Decode(e) => {
                tracing::error!("Decode error: {e}");
                "Unexpected response from server".to_string()
            }
            PortalError::Io(e) => {
                tracing::error!("I/O error: {e}");
                format!("Could not read file: {e}")
            }
        }
    }
}
