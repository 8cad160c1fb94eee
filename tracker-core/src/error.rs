use thiserror::Error;

/// Failure of a single dashboard request. Every variant ends up as the
/// `Failed` state of the channel that issued the request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
    #[error("response decoding error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("empty result from {0}")]
    EmptyResult(&'static str),
}

/// Coarse category shown to the user next to the retry button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
    EmptyResult,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) | FetchError::Url(_) => ErrorKind::Network,
            FetchError::Decode(_) => ErrorKind::Decode,
            FetchError::EmptyResult(_) => ErrorKind::EmptyResult,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
