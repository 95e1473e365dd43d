//! Content errors

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Front-matter parsing and validation errors
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("front-matter block opened with `---` is never closed")]
    Unterminated,

    #[error("invalid front-matter YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing front-matter field `{0}`")]
    MissingField(&'static str),

    #[error("front-matter field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// Errors raised while reading the content directory
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}
