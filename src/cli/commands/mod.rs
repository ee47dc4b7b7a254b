//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and builds a client
//! 2. Bootstraps the session when the command needs one
//! 3. Drives the session or gateway and formats the result
//!
//! # Async Commands
//!
//! The session and gateway are async. Handlers stay synchronous and run
//! their async body on a `tokio::runtime::Runtime` created per command.

mod calls;
mod completion;
mod login;
mod logout;
mod refresh;
mod status;

// Re-export command functions for testing and direct invocation
pub use calls::calls;
pub use completion::completion;
pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use status::status;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::cli::Context;
use crate::client::TriageClient;
use crate::config::Config;

/// Message shown whenever the session ends without the user asking.
pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out. Run 'triage login' to sign in again.";

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Login {
            email,
            password_stdin,
        } => login(ctx, email.as_deref(), password_stdin),
        Command::Logout => logout(ctx),
        Command::Status => status(ctx),
        Command::Refresh => refresh(ctx),
        Command::Calls => calls(ctx),
        Command::Completion { shell } => completion(shell),
    }
}

/// Load configuration and assemble a client for `ctx`.
fn build_client(ctx: &Context) -> Result<TriageClient> {
    let config = Config::load(ctx.config_path.as_deref()).context("Failed to load configuration")?;
    TriageClient::new(config).context("Failed to initialize client")
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to start async runtime")
}
