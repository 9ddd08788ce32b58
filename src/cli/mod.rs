//! CLI-specific functionality for the word lookup tool
//!
//! Argument parsing and terminal output. Configuration discovery lives in
//! [`crate::config`] so library users share it.

pub mod args;
pub mod display;

pub use args::{Args, Commands, ExecutionMode, LookupCommand};
pub use display::{render_word, show_discovery_info};
