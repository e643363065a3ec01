//! Error types for openapi-bundle.
//!
//! Library crates use [`BundleError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bundling operations.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// The base document does not exist.
    #[error("base document not found at {path:?}")]
    MissingBase { path: PathBuf },

    /// A document failed to parse or has the wrong top-level shape.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The composite document could not be serialized.
    #[error("serialization error: {message}")]
    Serialize { message: String },

    /// Fragment files redefine the same key and duplicates are not allowed.
    #[error("{count} duplicate fragment key(s): {summary}")]
    DuplicateKeys { count: usize, summary: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BundleError>;

impl BundleError {
    /// Create a parse error for a specific file.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a serialization error from any displayable message.
    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BundleError::config("unknown field `layot`");
        assert_eq!(err.to_string(), "config error: unknown field `layot`");

        let err = BundleError::parse("openapi/paths/users.yaml", "expected a mapping");
        let msg = err.to_string();
        assert!(msg.contains("users.yaml"));
        assert!(msg.contains("expected a mapping"));
    }

    #[test]
    fn missing_base_names_the_path() {
        let err = BundleError::MissingBase {
            path: PathBuf::from("openapi/base.yaml"),
        };
        assert!(err.to_string().contains("openapi/base.yaml"));
    }
}
