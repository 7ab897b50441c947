//! Error handling for standalone-ds.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for standalone-ds operations.
///
/// Missing configuration nodes are not errors: the extractor reports them as
/// an `Extraction::Error` value. This type covers the failures that abort
/// the whole invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file exists but could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not UTF-8 encoded.
    #[error(
        "'{}' is not valid UTF-8 (only UTF-8 documents are supported): {source}",
        .path.display()
    )]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// The configuration file is not well-formed XML.
    #[error("malformed XML in '{}': {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    /// A stored argument value is not valid for the requested type.
    #[error("invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    /// Settings could not be resolved from the argument map.
    #[error("configuration error: {0}")]
    Config(String),
    /// The result could not be rendered in the requested format.
    #[error("render error: {0}")]
    Render(String),
    /// The tracing subscriber could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl Error {
    pub(crate) fn invalid_value(key: &str, value: &str, expected: &'static str) -> Self {
        Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected,
        }
    }
}

/// A Result type alias for standalone-ds operations.
pub type Result<T> = std::result::Result<T, Error>;
