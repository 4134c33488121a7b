//! Client error types.

use thiserror::Error;

/// Errors from talking to the recipe API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status. `message` is a single line: the server's `error`
    /// field when it sent one, otherwise a short excerpt of the body.
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("recipe not found")]
    NotFound,

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Single-line message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => {
                "The recipe service took too long to respond. Please try again.".to_string()
            }
            ClientError::Transport(_) => {
                "Could not reach the recipe service. Check your connection and try again."
                    .to_string()
            }
            ClientError::Server { status, message } if message.is_empty() => {
                format!("Failed to load recipes (status {status}).")
            }
            ClientError::Server { status, message } => {
                format!("Failed to load recipes (status {status}): {message}")
            }
            ClientError::Decode(_) => {
                "Received an unexpected response from the recipe service.".to_string()
            }
            ClientError::NotFound => "Recipe not found.".to_string(),
            ClientError::Url(_) => "The recipe service address is misconfigured.".to_string(),
        }
    }
}
