//! Error types for norm.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::directives::SENTINEL;

/// The main error type for norm operations.
///
/// Every variant is fatal: a run stops at the first error and no output file
/// is written.
#[derive(Debug, Error)]
pub enum NormError {
    /// The first non-blank line is not the sentinel.
    #[error("Not a valid norm file: line {line} must be {sentinel:?}, found {found:?}", sentinel = SENTINEL)]
    MissingSentinel { line: usize, found: String },

    /// A known directive with the wrong arity or shape.
    #[error("Format error on line {line}: {text:?}")]
    Format { line: usize, text: String },

    /// A directive-prefixed line that is not accepted where it appears: an
    /// unknown keyword, or a known one outside its scope.
    #[error("Unknown command on line {line}: {text:?}")]
    UnknownDirective { line: usize, text: String },

    /// A command failed to render.
    #[error("Failed to render command '{command}': {source}")]
    TemplateRender {
        command: String,
        #[source]
        source: std::fmt::Error,
    },

    /// The external formatter could not run or rejected the source.
    #[error("Formatter '{program}' failed: {message}")]
    Formatter { program: String, message: String },

    /// Configuration file unreadable or invalid.
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Input read or output write failure.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NormError {
    /// Create a format error for the given line.
    pub fn format(line: usize, text: impl Into<String>) -> Self {
        Self::Format {
            line,
            text: text.into(),
        }
    }

    /// Create an unknown directive error for the given line.
    pub fn unknown(line: usize, text: impl Into<String>) -> Self {
        Self::UnknownDirective {
            line,
            text: text.into(),
        }
    }

    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// The 1-based source line for parse-time errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MissingSentinel { line, .. }
            | Self::Format { line, .. }
            | Self::UnknownDirective { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias for norm operations.
pub type NormResult<T> = Result<T, NormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NormError::format(4, "-- !input email");
        assert_eq!(
            err.to_string(),
            "Format error on line 4: \"-- !input email\""
        );

        let err = NormError::unknown(7, "-- !foo x");
        assert_eq!(err.to_string(), "Unknown command on line 7: \"-- !foo x\"");
    }

    #[test]
    fn test_sentinel_display() {
        let err = NormError::MissingSentinel {
            line: 1,
            found: "select 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Not a valid norm file: line 1 must be \"-- !norm\", found \"select 1\""
        );
    }

    #[test]
    fn test_line_accessor() {
        assert_eq!(NormError::unknown(3, "-- !exec B").line(), Some(3));
        let io = NormError::io("db.go", std::io::Error::other("disk full"));
        assert_eq!(io.line(), None);
        assert_eq!(io.to_string(), "IO error on db.go: disk full");
    }
}
