//! Pending command - describe the staged transaction

use chrono::Utc;

use super::CommandContext;
use crate::units::to_display_unit;

pub fn execute(ctx: &CommandContext) -> String {
    let Some(staged) = ctx.stager.pending() else {
        return "No pending transaction.".to_string();
    };

    let template = &staged.template;
    let mut msg = String::new();
    msg.push_str(&format!("**Pending transaction** (from {:?})\n", template.hash));
    msg.push_str(&format!("To: {:?}\n", template.to));
    msg.push_str(&format!("Value: {} ETH\n", to_display_unit(template.value)));
    msg.push_str(&format!("Gas limit: {}\n", template.gas));
    msg.push_str(&format!("Gas price: {} wei\n", template.gas_price));
    msg.push_str(&format!("Max cost: {} ETH\n", to_display_unit(template.cost())));
    msg.push_str(&format!(
        "Calldata: {} bytes\n",
        template.data.len()
    ));
    msg.push_str(&format!(
        "Expires in {}s. Reply y to send or n to cancel.",
        staged.remaining_secs(Utc::now())
    ));
    msg
}
