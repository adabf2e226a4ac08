use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a section table.
#[derive(Debug, Error)]
pub(crate) enum TableError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("section table json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("section table has no acts")]
    Empty,
    #[error("act #{index} ({name:?}) has non-positive length {length}")]
    ActLength {
        index: usize,
        name: String,
        length: i64,
    },
    #[error("sub-act #{index} ({name:?}) of act {act:?} has non-positive length {length}")]
    SubActLength {
        act: String,
        index: usize,
        name: String,
        length: i64,
    },
    #[error("declared total length {0} is not positive")]
    TotalLength(i64),
    #[error("summed act lengths overflow the page counter")]
    Overflow,
}

/// Errors raised while resolving the current page.
#[derive(Debug, Error)]
pub(crate) enum PageError {
    #[error("missing page")]
    Missing,
    #[error("invalid page {0:?}: expected a non-negative integer")]
    Invalid(String),
    #[error("page source returned status {0}")]
    Status(u16),
    #[error("page source request failed: {0}")]
    Transport(String),
    #[error("page source json: {0}")]
    Json(String),
    #[error("page source document has no {0:?} field")]
    MissingField(String),
}

/// Errors raised while loading the tool configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config json {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {name}: {value:?}")]
    Env { name: String, value: String },
}
