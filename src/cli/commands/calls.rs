//! calls command - List call records

use anyhow::{bail, Context as _, Result};

use super::{build_client, runtime, LOGGED_OUT_MESSAGE};
use crate::auth::AuthError;
use crate::cli::Context;
use crate::gateway::GatewayError;
use crate::ui::output;

/// Fetch call records and print one line per record.
pub fn calls(ctx: &Context) -> Result<()> {
    let client = build_client(ctx)?;

    let result = runtime()?.block_on(async {
        if !client.session().bootstrap().await.is_authenticated() {
            return None;
        }
        Some(client.list_calls().await)
    });

    let records = match result {
        None => bail!(AuthError::NotAuthenticated),
        Some(Err(GatewayError::Unauthorized)) => bail!(unauthorized_message(
            client.session().status().is_authenticated()
        )),
        Some(other) => other.context("Failed to fetch call records")?,
    };

    if records.is_empty() {
        output::print("No call records.", ctx.verbosity());
        return Ok(());
    }

    let width = records
        .iter()
        .map(|r| r.id.to_string().len())
        .max()
        .unwrap_or(0);
    for record in &records {
        output::plain(output::format_row(&record.id, record.caller_display(), width));
    }

    Ok(())
}

/// What to tell the user when the listing is still rejected after a retry.
fn unauthorized_message(still_authenticated: bool) -> &'static str {
    if still_authenticated {
        "The server rejected the request even after refreshing the session."
    } else {
        LOGGED_OUT_MESSAGE
    }
}
