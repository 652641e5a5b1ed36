//! Error types for Tracewatch
//!
//! Uses `thiserror` for library errors; `anyhow` is reserved for the binary.

use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type alias for Tracewatch operations
pub type TracewatchResult<T> = Result<T, TracewatchError>;

/// Main error type for Tracewatch operations
#[derive(Error, Debug)]
pub enum TracewatchError {
    /// The external compiler could not be resolved. Fatal: nothing can be
    /// compiled without it, so the whole pass aborts.
    #[error("unable to resolve {tool}@{version}: {message}")]
    ToolResolution {
        tool: String,
        version: String,
        message: String,
    },

    /// The external compiler ran and reported a failure.
    #[error(transparent)]
    Compilation(#[from] Diagnostic),

    /// Invalid configuration file
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_tool_resolution() {
        let err = TracewatchError::ToolResolution {
            tool: "traceur".to_string(),
            version: "0.0.49".to_string(),
            message: "npm install failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unable to resolve traceur@0.0.49: npm install failed"
        );
    }

    #[test]
    fn test_error_display_invalid_config() {
        let err = TracewatchError::InvalidConfig {
            file: PathBuf::from("tracewatch.toml"),
            message: "unknown field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration in tracewatch.toml: unknown field"
        );
    }
}
