//! Help command - shows available commands

pub fn execute() -> String {
    "**QuickTask Commands**\n\n\
    - `!balance` - Show the operator account balance\n\
    - `!qt <tx hash>` - Simulate a transaction and stage it for confirmation\n\
    - `y` - Re-sign and broadcast the staged transaction\n\
    - `n` - Discard the staged transaction\n\
    - `!pending` - Show the staged transaction\n\
    - `!help` - Show this message"
        .to_string()
}
