use thiserror::Error;

/// Failures while fetching a series file. The core never sees these:
/// it only receives the file contents.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters so tokens in URLs never reach logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        SourceError::Network(sanitized)
    }
}
