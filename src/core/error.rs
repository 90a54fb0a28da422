//! Error handling for devstack.
//!
//! The error system is built around two types:
//! - [`DevstackError`] - strongly-typed failure cases for precise handling
//! - [`ErrorContext`] - wrapper adding a user-facing suggestion and details
//!
//! Errors flow through the call graph as [`anyhow::Error`] with context
//! attached via `.context()` / `.with_context()`. At the CLI boundary,
//! [`user_friendly_error`] downcasts back to the typed variants and maps each
//! one to actionable guidance before the process exits.
//!
//! # Error Categories
//!
//! - **Configuration**: [`DevstackError::ConfigNotFound`],
//!   [`DevstackError::ConfigParseError`] - fatal before anything is written
//! - **Descriptor construction**: [`DevstackError::SectionWriteError`],
//!   [`DevstackError::UnsupportedValue`] - fatal; the descriptor is committed
//!   atomically, so a failed run leaves nothing on disk
//! - **External collaborators**: git, docker and hook failures - surfaced as
//!   typed errors rather than ignored exit codes

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for devstack operations.
///
/// Each variant represents a specific failure mode and carries the details
/// (paths, URLs, reasons) needed to explain it to the user.
#[derive(Error, Debug)]
pub enum DevstackError {
    /// The configuration document does not exist at the given path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// The configuration document could not be parsed.
    #[error("Invalid configuration in {file}")]
    ConfigParseError {
        /// The configuration file path
        file: String,
        /// Parser error message
        reason: String,
    },

    /// A descriptor section could not be constructed or appended.
    #[error("Failed to write section '{section}' to the descriptor")]
    SectionWriteError {
        /// Name of the section being written
        section: String,
        /// What went wrong
        reason: String,
    },

    /// A value in a custom service block cannot be represented in the
    /// descriptor markup.
    ///
    /// Only strings, string sequences and nested mappings are supported;
    /// anything else is rejected instead of silently coerced.
    #[error("Unsupported {kind} value at key '{key}' in custom service block")]
    UnsupportedValue {
        /// Key whose value is out of contract
        key: String,
        /// Human-readable type name of the offending value
        kind: String,
    },

    /// Git executable not available.
    #[error("Git is not installed or not found in PATH")]
    GitNotFound,

    /// Repository clone failed.
    #[error("Failed to clone repository: {url}")]
    GitCloneFailed {
        /// Repository URL that failed to clone
        url: String,
        /// Reason for the failure
        reason: String,
    },

    /// A git command returned a non-zero exit code.
    #[error("Git operation failed: {operation}")]
    GitCommandError {
        /// The git operation that failed
        operation: String,
        /// Error output from git
        stderr: String,
    },

    /// Docker executable not available.
    #[error("Docker is not installed or not found in PATH")]
    DockerNotFound,

    /// A docker command returned a non-zero exit code.
    #[error("Docker operation failed: {operation}")]
    DockerCommandError {
        /// The docker operation that failed
        operation: String,
        /// Reason for the failure
        reason: String,
    },

    /// A post-provision hook script failed.
    #[error("Hook '{hook}' failed for unit '{unit}'")]
    HookFailed {
        /// Hook name as declared in the configuration
        hook: String,
        /// Unit the hook ran for
        unit: String,
        /// Reason for the failure
        reason: String,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Generic error with a message.
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

/// A [`DevstackError`] enriched with a user-facing suggestion and details.
///
/// Displayed at the CLI boundary with color coding: the error in red, details
/// in yellow, the suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DevstackError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: DevstackError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining why the error occurred.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Recognizes [`DevstackError`] variants and common [`std::io::Error`] kinds
/// and attaches tailored suggestions; everything else falls through to a
/// generic context carrying the full error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(devstack_error) = error.downcast_ref::<DevstackError>() {
        return create_error_context(devstack_error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DevstackError::Other {
                    message: error.to_string(),
                })
                .with_suggestion(
                    "Check file ownership, or re-run with elevated permissions \
                     (patching the hosts file usually requires sudo)",
                )
                .with_details("A file could not be read or written due to permissions");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DevstackError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> = error
        .chain()
        .skip(1)
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DevstackError::Other { message })
}

/// Map each typed error to a context with tailored suggestions.
fn create_error_context(error: &DevstackError) -> ErrorContext {
    match error {
        DevstackError::ConfigNotFound { path } => {
            ErrorContext::new(DevstackError::ConfigNotFound { path: path.clone() })
                .with_suggestion("Run 'devstack init' to create a sample configuration")
                .with_details("The configuration document describes the project, its repositories, databases and queues")
        }

        DevstackError::ConfigParseError { file, reason } => {
            ErrorContext::new(DevstackError::ConfigParseError {
                file: file.clone(),
                reason: reason.clone(),
            })
            .with_suggestion(
                "Check the JSON syntax and the framework/database/queue tags against the documented closed sets",
            )
            .with_details(reason.clone())
        }

        DevstackError::SectionWriteError { section, reason } => {
            ErrorContext::new(DevstackError::SectionWriteError {
                section: section.clone(),
                reason: reason.clone(),
            })
            .with_details(reason.clone())
            .with_suggestion(
                "A half-built topology is unsafe to start, so the run stops at the first failed section",
            )
        }

        DevstackError::UnsupportedValue { key, kind } => {
            ErrorContext::new(DevstackError::UnsupportedValue {
                key: key.clone(),
                kind: kind.clone(),
            })
            .with_suggestion("Quote the value as a string; custom blocks support strings, string lists and nested mappings")
        }

        DevstackError::GitNotFound => ErrorContext::new(DevstackError::GitNotFound)
            .with_suggestion(
                "Install git from https://git-scm.com/ or your package manager (e.g. 'apt install git')",
            )
            .with_details("Devstack invokes the system git to retrieve application repositories"),

        DevstackError::GitCloneFailed { url, reason } => {
            ErrorContext::new(DevstackError::GitCloneFailed {
                url: url.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Check the repository URL and your access rights")
            .with_details(reason.clone())
        }

        DevstackError::GitCommandError { operation, stderr } => {
            ErrorContext::new(DevstackError::GitCommandError {
                operation: operation.clone(),
                stderr: stderr.clone(),
            })
            .with_details(stderr.clone())
        }

        DevstackError::DockerNotFound => ErrorContext::new(DevstackError::DockerNotFound)
            .with_suggestion("Install Docker and the compose plugin, and make sure the daemon is running")
            .with_details("Devstack starts the generated stack with 'docker compose up'"),

        DevstackError::DockerCommandError { operation, reason } => {
            ErrorContext::new(DevstackError::DockerCommandError {
                operation: operation.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Inspect the compose output above; the generated docker-compose.yml is kept for debugging")
            .with_details(reason.clone())
        }

        DevstackError::HookFailed { hook, unit, reason } => {
            ErrorContext::new(DevstackError::HookFailed {
                hook: hook.clone(),
                unit: unit.clone(),
                reason: reason.clone(),
            })
            .with_suggestion("Run the hook script manually from the stack root to reproduce the failure")
            .with_details(reason.clone())
        }

        DevstackError::IoError(_) | DevstackError::Other { .. } => {
            ErrorContext::new(DevstackError::Other {
                message: error.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_display_format() {
        let ctx = ErrorContext::new(DevstackError::GitNotFound)
            .with_suggestion("install git")
            .with_details("needed for clones");

        let rendered = format!("{ctx}");
        assert!(rendered.contains("Git is not installed"));
        assert!(rendered.contains("Details: needed for clones"));
        assert!(rendered.contains("Suggestion: install git"));
    }

    #[test]
    fn test_user_friendly_error_downcasts_typed_errors() {
        let err = anyhow::Error::from(DevstackError::ConfigNotFound {
            path: "stack.json".to_string(),
        });

        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, DevstackError::ConfigNotFound { .. }));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_error_generic_includes_chain() {
        let err = anyhow::anyhow!("root cause").context("outer context");

        let ctx = user_friendly_error(err);
        match ctx.error {
            DevstackError::Other { message } => {
                assert!(message.contains("outer context"));
                assert!(message.contains("Caused by:"));
                assert!(message.contains("root cause"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
