//! Error types and exit codes for noteo
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, malformed tag, regex or date)
//! - 3: Data/repository error (missing repository, invalid front matter, etc.)

mod macros;

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Exit codes for the noteo binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/repository error - missing repository, invalid front matter (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during noteo operations.
///
/// The type is `Clone` so that a memoized load failure can be handed out
/// again on every later access to the same note.
#[derive(Error, Debug, Clone)]
pub enum NoteoError {
    // Validation errors (exit code 2)
    #[error("{0} is not a valid tag")]
    InvalidTag(String),

    #[error("tag {tag} is not name:value")]
    NoValue { tag: String },

    #[error("cannot parse {value:?}: {reason}")]
    Parse { value: String, reason: String },

    #[error("not supported date format: {0}")]
    UnsupportedDateFormat(String),

    #[error("invalid regular expression {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data/repository errors (exit code 3)
    #[error("not a noteo repository (or any of the parent directories of {search_root:?})")]
    RepositoryNotFound { search_root: PathBuf },

    #[error("repository already initialized at {path:?}")]
    AlreadyInitialized { path: PathBuf },

    #[error("{path:?} YAML front matter unmarshal failed: {reason}")]
    InvalidFrontMatter { path: PathBuf, reason: String },

    // Per-item failures (exit code 1)
    #[error("executing predicate failed on note {path:?}: {source}")]
    Predicate {
        path: PathBuf,
        #[source]
        source: Box<NoteoError>,
    },

    #[error("note {path:?}: {source}")]
    Note {
        path: PathBuf,
        #[source]
        source: Box<NoteoError>,
    },

    #[error("comparing notes failed {first:?} and {second:?}: {source}")]
    Compare {
        first: PathBuf,
        second: PathBuf,
        #[source]
        source: Box<NoteoError>,
    },

    #[error("cannot resolve link {link:?} in {path:?}: {reason}")]
    LinkResolution {
        path: PathBuf,
        link: String,
        reason: String,
    },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("YAML error: {0}")]
    Yaml(Arc<serde_yaml::Error>),

    #[error("JSON error: {0}")]
    Json(Arc<serde_json::Error>),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("move failed")]
    MoveFailed,

    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for NoteoError {
    fn from(err: std::io::Error) -> Self {
        NoteoError::Io(Arc::new(err))
    }
}

impl From<serde_yaml::Error> for NoteoError {
    fn from(err: serde_yaml::Error) -> Self {
        NoteoError::Yaml(Arc::new(err))
    }
}

impl From<serde_json::Error> for NoteoError {
    fn from(err: serde_json::Error) -> Self {
        NoteoError::Json(Arc::new(err))
    }
}

impl From<walkdir::Error> for NoteoError {
    fn from(err: walkdir::Error) -> Self {
        let target = err
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        NoteoError::FailedOperationWithTarget {
            operation: "walk".to_string(),
            target,
            reason: err.to_string(),
        }
    }
}

impl NoteoError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        NoteoError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        NoteoError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        NoteoError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Create an error for a regular expression that failed to compile
    pub fn invalid_regex(pattern: &str, error: impl std::fmt::Display) -> Self {
        NoteoError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create a parse error naming the value that could not be parsed
    pub fn parse(value: &str, error: impl std::fmt::Display) -> Self {
        NoteoError::Parse {
            value: value.to_string(),
            reason: error.to_string(),
        }
    }

    /// Attach the path of the note a predicate was evaluated on
    pub fn on_note(self, path: impl Into<PathBuf>) -> Self {
        NoteoError::Predicate {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Attach the path of the note an error happened on. Errors that already
    /// name their note are returned unchanged.
    pub fn in_note(self, path: impl Into<PathBuf>) -> Self {
        match self {
            NoteoError::Note { .. }
            | NoteoError::Predicate { .. }
            | NoteoError::LinkResolution { .. }
            | NoteoError::InvalidFrontMatter { .. } => self,
            other => NoteoError::Note {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NoteoError::InvalidTag(_)
            | NoteoError::NoValue { .. }
            | NoteoError::Parse { .. }
            | NoteoError::UnsupportedDateFormat(_)
            | NoteoError::InvalidRegex { .. }
            | NoteoError::UsageError(_)
            | NoteoError::InvalidValue { .. }
            | NoteoError::Unsupported { .. } => ExitCode::Usage,

            NoteoError::RepositoryNotFound { .. }
            | NoteoError::AlreadyInitialized { .. }
            | NoteoError::InvalidFrontMatter { .. } => ExitCode::Data,

            NoteoError::Predicate { .. }
            | NoteoError::Note { .. }
            | NoteoError::Compare { .. }
            | NoteoError::LinkResolution { .. }
            | NoteoError::Io(_)
            | NoteoError::Yaml(_)
            | NoteoError::Json(_)
            | NoteoError::FailedOperationWithTarget { .. }
            | NoteoError::MoveFailed
            | NoteoError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    fn error_type(&self) -> &'static str {
        match self {
            NoteoError::InvalidTag(_) => "invalid_tag",
            NoteoError::NoValue { .. } => "no_value",
            NoteoError::Parse { .. } => "parse_error",
            NoteoError::UnsupportedDateFormat(_) => "unsupported_date_format",
            NoteoError::InvalidRegex { .. } => "invalid_regex",
            NoteoError::UsageError(_) => "usage_error",
            NoteoError::InvalidValue { .. } => "invalid_value",
            NoteoError::Unsupported { .. } => "unsupported",
            NoteoError::RepositoryNotFound { .. } => "repository_not_found",
            NoteoError::AlreadyInitialized { .. } => "already_initialized",
            NoteoError::InvalidFrontMatter { .. } => "invalid_front_matter",
            NoteoError::Predicate { .. } => "predicate_failed",
            NoteoError::Note { .. } => "note_failed",
            NoteoError::Compare { .. } => "compare_failed",
            NoteoError::LinkResolution { .. } => "link_resolution",
            NoteoError::Io(_) => "io_error",
            NoteoError::Yaml(_) => "yaml_error",
            NoteoError::Json(_) => "json_error",
            NoteoError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            NoteoError::MoveFailed => "move_failed",
            NoteoError::Other(_) => "other",
        }
    }

    /// Whether this error means no repository could be found
    pub fn is_not_repository(&self) -> bool {
        matches!(self, NoteoError::RepositoryNotFound { .. })
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for noteo operations
pub type Result<T> = std::result::Result<T, NoteoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            NoteoError::InvalidTag("foo bar".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            NoteoError::RepositoryNotFound {
                search_root: PathBuf::from("/tmp")
            }
            .exit_code(),
            ExitCode::Data
        );
        assert_eq!(NoteoError::MoveFailed.exit_code(), ExitCode::Failure);
    }

    #[test]
    fn test_predicate_error_names_note() {
        let err = NoteoError::NoValue {
            tag: "priority".into(),
        }
        .on_note("notes/a.md");
        let message = err.to_string();
        assert!(message.contains("notes/a.md"));
        assert!(message.contains("tag priority is not name:value"));
    }

    #[test]
    fn test_in_note_names_the_note_once() {
        let err = NoteoError::InvalidTag("foo bar".into()).in_note("notes/a.md");
        assert!(matches!(err, NoteoError::Note { ref path, .. } if path.ends_with("a.md")));
        assert!(err.to_string().contains("notes/a.md"));
        assert_eq!(err.exit_code(), ExitCode::Failure);

        let again = err.clone().in_note("other.md");
        assert_eq!(again.to_string(), err.to_string());
    }

    #[test]
    fn test_io_error_is_cloneable() {
        let err: NoteoError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        let again = err.clone();
        assert_eq!(err.to_string(), again.to_string());
    }

    #[test]
    fn test_to_json_envelope() {
        let json = NoteoError::UsageError("no name given".into()).to_json();
        assert_eq!(json["error"]["code"], 2);
        assert_eq!(json["error"]["type"], "usage_error");
        assert_eq!(json["error"]["message"], "no name given");
    }
}
