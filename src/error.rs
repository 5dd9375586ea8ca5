use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to fetch {source_name}: {message}")]
    Fetch { source_name: String, message: String },
    #[error("failed to read {path}: {err}")]
    Io {
        path: String,
        #[source]
        err: std::io::Error,
    },
    #[error("invalid JSON in {context}: {err}")]
    Json {
        context: String,
        #[source]
        err: serde_json::Error,
    },
    #[error("invalid topology: {0}")]
    Topology(String),
    #[error("invalid country mapping: {0}")]
    Mapping(String),
    #[error("payload element #{0} not found in page")]
    PayloadNotFound(String),
    #[error("fetching URLs requires the 'fetch' feature: {0}")]
    FetchDisabled(String),
}

pub type Result<T> = std::result::Result<T, Error>;
