use thiserror::Error;

pub type Result<T> = std::result::Result<T, FactCheckToolsError>;

#[derive(Debug, Error)]
pub enum FactCheckToolsError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl FactCheckToolsError {
    /// Status code of the upstream response, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            FactCheckToolsError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FactCheckToolsError {
    fn from(err: reqwest::Error) -> Self {
        FactCheckToolsError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FactCheckToolsError {
    fn from(err: serde_json::Error) -> Self {
        FactCheckToolsError::Parse(err.to_string())
    }
}
