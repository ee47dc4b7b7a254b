//! refresh command - Exchange the refresh token for a new access token

use anyhow::{bail, Result};

use super::{build_client, runtime, LOGGED_OUT_MESSAGE};
use crate::auth::{AuthError, RefreshOutcome};
use crate::cli::Context;
use crate::ui::output;

/// Refresh the access token now.
///
/// A failed refresh clears the session; the command then reports the
/// logout and exits non-zero.
pub fn refresh(ctx: &Context) -> Result<()> {
    let client = build_client(ctx)?;
    let session = client.session();

    let outcome = runtime()?.block_on(async {
        if !session.bootstrap().await.is_authenticated() {
            return None;
        }
        Some(session.refresh().await)
    });

    match outcome {
        None => bail!(AuthError::NotAuthenticated),
        Some(RefreshOutcome::Refreshed) | Some(RefreshOutcome::Coalesced) => {
            output::success("Access token refreshed.", ctx.verbosity());
            Ok(())
        }
        Some(RefreshOutcome::LoggedOut(reason)) => {
            output::warn(&reason, ctx.verbosity());
            bail!(LOGGED_OUT_MESSAGE)
        }
    }
}
