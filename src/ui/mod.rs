//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive prompts, including masked password entry
//! - [`output`] - Output formatting and display
//!
//! Command handlers print through [`output`] so that `--quiet` behaves the
//! same everywhere. Diagnostic logging goes through `tracing` instead.

pub mod output;
pub mod prompts;
