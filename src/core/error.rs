//! Error handling for bowser-render
//!
//! The render engine reports failures through [`BowserError`], a strongly-typed
//! enum built with `thiserror`. The CLI converts any [`anyhow::Error`] that
//! bubbles up into an [`ErrorContext`] via [`user_friendly_error`], which adds
//! colored output, details, and an actionable suggestion.
//!
//! # Error Categories
//!
//! ## Rendering
//! - [`BowserError::InvalidLoopDirective`] - a `loop` attribute that is not `<var> in <collection>`
//! - [`BowserError::ResolutionFailed`] - a dotted path walked through a null or absent value
//!
//! ## Inputs
//! - [`BowserError::MarkupParse`] - the template fragment could not be parsed
//! - [`BowserError::InvalidContext`] - the context document is not a JSON object
//! - [`BowserError::ConfigError`] - invalid `bowser.toml` settings
//!
//! ## Wrapped library errors
//! - [`BowserError::IoError`], [`BowserError::JsonError`], [`BowserError::TomlError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use bowser_render::core::{BowserError, ErrorContext};
//!
//! let context = ErrorContext::new(BowserError::InvalidLoopDirective {
//!     directive: "item of items".to_string(),
//! })
//! .with_suggestion("Write loops as `loop=\"item in items\"`");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bowser-render operations
#[derive(Error, Debug)]
pub enum BowserError {
    /// A `loop` directive did not have the `<variable> in <collection>` shape.
    ///
    /// The directive is split on single spaces and must yield exactly three
    /// tokens with `in` in the middle.
    #[error("Invalid loop: {directive}")]
    InvalidLoopDirective {
        /// The raw attribute value
        directive: String,
    },

    /// A dotted path dereferenced a null or absent intermediate value.
    ///
    /// A missing top-level name is not an error (it resolves to null); only
    /// walking further into that null is.
    #[error("Problem resolving expression: {expression} ('{segment}' is null)")]
    ResolutionFailed {
        /// The full expression being resolved
        expression: String,
        /// The path segment that resolved to null
        segment: String,
        /// Names from the render scope that look like `segment`
        suggestions: Vec<String>,
    },

    #[error("Invalid markup: {reason}")]
    MarkupParse {
        reason: String,
    },

    #[error("Invalid render context: {reason}")]
    InvalidContext {
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{message}")]
    Other {
        message: String,
    },
}

impl Clone for BowserError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidLoopDirective {
                directive,
            } => Self::InvalidLoopDirective {
                directive: directive.clone(),
            },
            Self::ResolutionFailed {
                expression,
                segment,
                suggestions,
            } => Self::ResolutionFailed {
                expression: expression.clone(),
                segment: segment.clone(),
                suggestions: suggestions.clone(),
            },
            Self::MarkupParse {
                reason,
            } => Self::MarkupParse {
                reason: reason.clone(),
            },
            Self::InvalidContext {
                reason,
            } => Self::InvalidContext {
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show the main message in red, optional details in
/// yellow and an optional suggestion in green.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: BowserError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: BowserError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
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

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`BowserError`] (directly or anywhere in the `anyhow` chain),
/// [`std::io::Error`] and [`toml::de::Error`]. Anything else is reported with
/// its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(bowser_error) = error.chain().find_map(|e| e.downcast_ref::<BowserError>()) {
        let context = create_error_context(bowser_error.clone());
        let outer = error.to_string();
        if outer != bowser_error.to_string() {
            // Wrapped with file context; keep the outer message
            return context.with_details(outer);
        }
        return context;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(BowserError::Other {
                    message: format!("Permission denied: {error:#}"),
                })
                .with_suggestion("Check the permissions on the template, context and output files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(BowserError::Other {
                    message: format!("File not found: {error:#}"),
                })
                .with_suggestion("Check that the file exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(BowserError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your bowser.toml file");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(BowserError::Other {
        message,
    })
}

fn create_error_context(error: BowserError) -> ErrorContext {
    match &error {
        BowserError::InvalidLoopDirective {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Write loop directives as `loop=\"item in items\"`, separated by single spaces")
            .with_details("A loop directive must be exactly three space-separated tokens: a variable name, `in`, and a collection expression"),

        BowserError::ResolutionFailed {
            segment,
            suggestions,
            ..
        } => {
            let suggestion = if suggestions.is_empty() {
                format!("Make sure '{segment}' is defined in the render context before reading its fields")
            } else {
                format!("Did you mean: {}?", suggestions.join(", "))
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("A missing top-level name renders as empty text, but reading a field of a missing or null value is an error")
        }

        BowserError::MarkupParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check for unclosed tags or comments in the template")
            .with_details("Every non-void element needs a matching end tag"),

        BowserError::InvalidContext {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("The context file must contain a JSON object, e.g. {\"name\": \"Ann\"}"),

        BowserError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the [directives] and [output] tables in bowser.toml"),

        BowserError::JsonError(_) => ErrorContext::new(error)
            .with_suggestion("Check the JSON syntax of the context file"),

        _ => ErrorContext::new(error),
    }
}
