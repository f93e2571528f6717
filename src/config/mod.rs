//! Configuration for bowser-render.
//!
//! Settings come from a single TOML file. The first of these that applies wins:
//!
//! 1. the path given with `--config` (it must exist)
//! 2. `bowser.toml` in the current directory
//! 3. `~/.bowser/config.toml` (`%LOCALAPPDATA%\bowser\config.toml` on Windows)
//! 4. built-in defaults
//!
//! ```toml
//! [directives]
//! condition = "if"
//! repeat = "loop"
//!
//! [output]
//! pretty = false
//! ```

mod render;

pub use render::{OutputConfig, PROJECT_CONFIG_FILE, RenderConfig};
