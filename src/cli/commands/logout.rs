//! logout command - Clear the stored session

use anyhow::Result;

use super::{build_client, runtime};
use crate::cli::Context;
use crate::ui::output;

/// Clear the session from memory and the secret store.
///
/// Always succeeds once the client is built; storage failures are logged
/// by the session and do not stop the logout.
pub fn logout(ctx: &Context) -> Result<()> {
    let client = build_client(ctx)?;
    runtime()?.block_on(client.session().logout());

    output::success("Logged out.", ctx.verbosity());
    Ok(())
}
