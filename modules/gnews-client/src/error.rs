use thiserror::Error;

pub type Result<T> = std::result::Result<T, GNewsError>;

#[derive(Debug, Error)]
pub enum GNewsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl GNewsError {
    pub fn status(&self) -> Option<u16> {
        match self {
            GNewsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GNewsError {
    fn from(err: reqwest::Error) -> Self {
        GNewsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GNewsError {
    fn from(err: serde_json::Error) -> Self {
        GNewsError::Parse(err.to_string())
    }
}
