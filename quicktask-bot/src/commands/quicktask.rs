//! Quicktask command - simulate and stage a transaction by hash

use ethers::types::H256;

use super::CommandContext;
use crate::error::QuickTaskError;
use crate::units::to_display_unit_rounded;

pub async fn execute(hash: H256, ctx: &CommandContext) -> Result<String, QuickTaskError> {
    let replacing = ctx.stager.has_pending();
    let staged = ctx.stager.stage(hash).await?;
    let template = &staged.template;

    let mut msg = format!(
        "Transaction will cost approximately {} ETH. Would you like to proceed? (y/n)",
        to_display_unit_rounded(template.cost(), 6)
    );

    if let Some(link) = staged
        .simulation
        .simulation_id
        .as_deref()
        .and_then(|id| ctx.simulation_link(id))
    {
        msg.push_str(&format!("\nSimulation: {}", link));
    }

    let minutes = ctx.stager.timeout().as_secs() / 60;
    if minutes > 0 {
        msg.push_str(&format!("\nThis request expires in {} minutes.", minutes));
    } else {
        msg.push_str(&format!(
            "\nThis request expires in {} seconds.",
            ctx.stager.timeout().as_secs()
        ));
    }

    if replacing {
        msg.push_str("\nThe previously pending transaction was discarded.");
    }

    Ok(msg)
}
