use std::path::PathBuf;

use attr_format::{JsonError, ModelError, NameError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read `{}`", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode base64 in `{}`", .path.display())]
    Base64 {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Cannot decode attributes in `{}`", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Cannot encode attributes for `{}`", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Cannot parse JSON in `{}`", .path.display())]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot convert JSON in `{}` to attributes", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: JsonError,
    },

    #[error("Invalid name {name:?} for entry {index}; use --no-check to allow it")]
    InvalidName {
        index: usize,
        name: String,
        #[source]
        source: NameError,
    },

    #[error("Cannot write `{}`", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} files failed validation")]
    ValidationFailed { failed: usize, total: usize },
}
