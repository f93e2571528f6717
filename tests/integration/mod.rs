//! Integration test suite for bowser-render
//!
//! # Running
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Organization
//!
//! - **render**: end-to-end renders through the public library API
//! - **cli**: the `bowser-render` binary, driven with `assert_cmd`

mod cli;
mod render;

use assert_cmd::Command;
use std::path::Path;

/// A `bowser-render` command isolated from the user's config files.
pub fn bowser_command(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bowser-render").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}
