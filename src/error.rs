use thiserror::Error;

pub type Result<T> = std::result::Result<T, GleanError>;

#[derive(Debug, Error)]
pub enum GleanError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("{0}")]
    Other(String),
}

impl GleanError {
    pub fn fetch(url: &str, reason: impl Into<String>) -> Self {
        GleanError::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/* Conversions so `?` works smoothly */
impl From<std::io::Error> for GleanError {
    fn from(e: std::io::Error) -> Self {
        GleanError::Storage(e.to_string())
    }
}
impl From<serde_json::Error> for GleanError {
    fn from(e: serde_json::Error) -> Self {
        GleanError::Other(e.to_string())
    }
}
impl From<reqwest::Error> for GleanError {
    fn from(e: reqwest::Error) -> Self {
        GleanError::Other(e.to_string())
    }
}
impl From<csv::Error> for GleanError {
    fn from(e: csv::Error) -> Self {
        GleanError::Storage(e.to_string())
    }
}
