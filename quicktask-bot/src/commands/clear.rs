//! Clear command - reject the staged transaction

use super::CommandContext;
use crate::error::QuickTaskError;

pub fn execute(ctx: &CommandContext) -> Result<String, QuickTaskError> {
    match ctx.stager.reject() {
        Ok(Some(staged)) => Ok(format!("Pending transaction {:?} cleared.", staged.template.hash)),
        Ok(None) => Ok("No pending transaction to clear.".to_string()),
        Err(QuickTaskError::ConfirmationInProgress) => Ok(
            "The pending transaction is already being broadcast and can no longer be cleared."
                .to_string(),
        ),
        Err(e) => Err(e),
    }
}
