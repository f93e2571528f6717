//! File helpers for the command-line front end.

pub mod fs;

pub use fs::{atomic_write, read_text};
