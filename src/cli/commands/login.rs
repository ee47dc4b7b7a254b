//! login command - Exchange email and password for a stored session
//!
//! # Security
//!
//! The password is read masked (or from stdin with `--password-stdin`),
//! never accepted as an argument, and never printed.

use std::io;

use anyhow::{anyhow, Context as _, Result};

use super::{build_client, runtime};
use crate::auth::AuthError;
use crate::cli::Context;
use crate::ui::{output, prompts};

/// Log in and persist the session.
///
/// A failed login leaves any existing session untouched.
pub fn login(ctx: &Context, email: Option<&str>, password_stdin: bool) -> Result<()> {
    let email = match email {
        Some(e) => e.to_string(),
        None => prompts::input("Email", ctx.interactive)
            .context("Email required. Use --email <EMAIL> or run interactively.")?,
    };

    let password = if password_stdin {
        prompts::read_line(&mut io::stdin().lock()).context("Failed to read password from stdin")?
    } else {
        prompts::password("Password", ctx.interactive)
            .context("Password required. Use --password-stdin or run interactively.")?
    };

    let client = build_client(ctx)?;
    runtime()?
        .block_on(client.session().login(&email, &password))
        .map_err(|e| anyhow!("Login failed: {}", failure_reason(&e)))?;

    output::success(format!("Logged in as {}.", email), ctx.verbosity());
    Ok(())
}

fn failure_reason(err: &AuthError) -> String {
    match err {
        AuthError::AuthFailure(reason) => reason.clone(),
        other => other.to_string(),
    }
}
