//! Balance command - shows the operator account balance

use super::CommandContext;
use crate::error::QuickTaskError;
use crate::units::to_display_unit;

pub async fn execute(ctx: &CommandContext) -> Result<String, QuickTaskError> {
    log::info!("Commands: Fetching balance of {:?}", ctx.operator);
    let balance = ctx.chain.balance(ctx.operator).await?;
    Ok(format!("Account balance: {} ETH", to_display_unit(balance)))
}
