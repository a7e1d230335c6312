use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Business rejections for reward claims.
///
/// These surface directly to the operator and block the action, unlike
/// rate-resolution failures which are always recovered locally.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("invalid wallet address: {reason}")]
    InvalidWallet { reason: String },

    #[error("claim rejected: {message}")]
    Rejected { message: String },
}

/// Engagement flow errors.
#[derive(Error, Debug)]
pub enum EngagementError {
    #[error("no boost baseline recorded - run `boost start` first")]
    NoBaseline,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Engagement(#[from] EngagementError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("chain read error: {0}")]
    Chain(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}
