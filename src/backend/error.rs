//! Errors returned by the lead backend

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Request never produced a response (connect, timeout, TLS)
    #[error("could not reach backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// 4xx with the server's validation message
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// 5xx
    #[error("backend error ({status})")]
    Server { status: StatusCode },

    /// 2xx body that does not have the expected shape
    #[error("unexpected backend response: {0}")]
    Malformed(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl BackendError {
    /// Map a non-success response to an error, pulling the message out of a
    /// JSON `{"error": ..}` or `{"message": ..}` body when there is one
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        if status.is_server_error() {
            return Self::Server { status };
        }
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                ["error", "message", "msg"]
                    .iter()
                    .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request rejected")
                        .to_string()
                } else {
                    trimmed.to_string()
                }
            });
        Self::Rejected { status, message }
    }
}
