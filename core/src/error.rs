use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {context}")]
    MalformedResponse { context: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("sink write failed for {path}: {source}")]
    SinkWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn malformed(context: impl Into<String>) -> Self {
        Error::MalformedResponse {
            context: context.into(),
        }
    }

    /// Transient failures worth retrying at the transport layer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::Validation(_)
                | Error::DateParse(_)
                | Error::MalformedResponse { .. }
        )
    }
}
