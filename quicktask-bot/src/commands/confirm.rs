//! Confirm command - re-sign and broadcast the staged transaction

use super::CommandContext;
use crate::error::QuickTaskError;

pub async fn execute(ctx: &CommandContext) -> Result<String, QuickTaskError> {
    let tx_hash = ctx.stager.confirm().await?;
    Ok(format!(
        "Transaction sent! Check the status here: {}",
        ctx.explorer_link(tx_hash)
    ))
}
