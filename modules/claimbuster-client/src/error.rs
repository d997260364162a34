use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClaimBusterError>;

#[derive(Debug, Error)]
pub enum ClaimBusterError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ClaimBusterError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClaimBusterError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClaimBusterError {
    fn from(err: reqwest::Error) -> Self {
        ClaimBusterError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClaimBusterError {
    fn from(err: serde_json::Error) -> Self {
        ClaimBusterError::Parse(err.to_string())
    }
}
