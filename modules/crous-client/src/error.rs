use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrousError>;

#[derive(Debug, Error)]
pub enum CrousError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for CrousError {
    fn from(err: reqwest::Error) -> Self {
        // A body that fails to decode surfaces as a reqwest error too.
        if err.is_decode() {
            CrousError::Parse(err.to_string())
        } else {
            CrousError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CrousError {
    fn from(err: serde_json::Error) -> Self {
        CrousError::Parse(err.to_string())
    }
}
