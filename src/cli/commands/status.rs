//! status command - Show whether a session is stored
//!
//! Never prints token values. In quiet mode prints exactly
//! `authenticated` or `not_authenticated`.

use anyhow::Result;
use chrono::Utc;

use super::{build_client, runtime};
use crate::auth::AuthStatus;
use crate::cli::Context;
use crate::ui::output;

/// Show authentication status.
pub fn status(ctx: &Context) -> Result<()> {
    let client = build_client(ctx)?;
    let session = client.session();
    let status = runtime()?.block_on(session.bootstrap());

    if ctx.quiet {
        output::plain(status);
        return Ok(());
    }

    match status {
        AuthStatus::Authenticated => {
            output::print("Authenticated.", ctx.verbosity());
            if let Some(expires_at) = session.refresh_token_expires_at() {
                let note = if expires_at <= Utc::now() {
                    " (expired)"
                } else {
                    ""
                };
                output::print(
                    format!(
                        "Session valid until {}{}",
                        expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        note
                    ),
                    ctx.verbosity(),
                );
            }
        }
        AuthStatus::Unauthenticated => {
            output::print("Not authenticated.", ctx.verbosity());
            output::print("Run 'triage login' to sign in.", ctx.verbosity());
        }
    }

    Ok(())
}
