//! Core types for bowser-render
//!
//! This module holds the error types shared by the render engine, the markup
//! parser, configuration loading and the CLI.
//!
//! # Error Management
//!
//! - **Strongly-typed errors** ([`BowserError`]) returned by the library
//! - **User-friendly contexts** ([`ErrorContext`]) with suggestions for CLI users
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for display
//!
//! ```rust
//! use bowser_render::core::{BowserError, user_friendly_error};
//!
//! let error = anyhow::Error::from(BowserError::InvalidLoopDirective {
//!     directive: "item of items".to_string(),
//! });
//! let friendly = user_friendly_error(error);
//! assert!(friendly.suggestion.is_some());
//! ```

pub mod error;

pub use error::{BowserError, ErrorContext, user_friendly_error};

/// Result alias used by the render engine and markup layer.
pub type Result<T, E = BowserError> = std::result::Result<T, E>;
