use std::io;
use thiserror::Error;

/// Errors surfaced at module boundaries: filesystem I/O, malformed on-disk
/// documents, and configuration mistakes caught at load time rather than at
/// use time (see the validator/target registry in `model.rs`).
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed document {path}: {source}")]
    MalformedDocument {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown validator or target tag: {0:?}")]
    UnknownTag(String),

    #[error("missing required artifact: {0}")]
    MissingArtifact(String),
}

pub type Result<T> = std::result::Result<T, Error>;
