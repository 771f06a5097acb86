//! Operator chat commands
//!
//! Chat text is resolved once into a `Command`; everything past `parse` works with
//! typed values only.

mod balance;
mod clear;
mod confirm;
mod help;
mod pending;
mod quicktask;

use ethers::types::{Address, H256};
use std::sync::Arc;

use crate::chain::ChainClient;
use crate::error::QuickTaskError;
use crate::staging::TxStager;

/// Commands the operator can send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the operator balance: `!balance`
    Balance,
    /// Simulate and stage a transaction: `!qt <hash>`
    Stage(H256),
    /// Broadcast the staged transaction: `y`
    Confirm,
    /// Drop the staged transaction: `n`
    Reject,
    /// Describe the staged transaction: `!pending`
    Pending,
    /// Show help: `!help`
    Help,
}

const QUICKTASK_USAGE: &str = "usage: !qt <transaction hash>";

/// Parse a chat message.
///
/// Returns `Ok(None)` for text that is not addressed to the bot and an error for a
/// recognised command with bad arguments.
pub fn parse(text: &str) -> Result<Option<Command>, QuickTaskError> {
    let text = text.trim();
    let lower = text.to_lowercase();

    match lower.as_str() {
        "y" => return Ok(Some(Command::Confirm)),
        "n" => return Ok(Some(Command::Reject)),
        _ => {}
    }

    if !lower.starts_with('!') {
        return Ok(None);
    }

    log::debug!("Commands: Parsing '{}'", text);

    if lower.starts_with("!balance") {
        Ok(Some(Command::Balance))
    } else if lower.starts_with("!qt") {
        let hash = text
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| QuickTaskError::MalformedRequest(QUICKTASK_USAGE.to_string()))?;
        Ok(Some(Command::Stage(parse_tx_hash(hash)?)))
    } else if lower.starts_with("!pending") {
        Ok(Some(Command::Pending))
    } else if lower.starts_with("!help") {
        Ok(Some(Command::Help))
    } else {
        log::debug!("Commands: Unknown command '{}'", text);
        Ok(None)
    }
}

/// Parse a 32-byte transaction hash, 0x prefix optional
pub fn parse_tx_hash(raw: &str) -> Result<H256, QuickTaskError> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    let invalid = || {
        QuickTaskError::MalformedRequest(format!(
            "'{}' is not a transaction hash (expected 0x followed by 64 hex digits)",
            raw
        ))
    };

    if digits.len() != 64 {
        return Err(invalid());
    }
    let bytes = hex::decode(digits).map_err(|_| invalid())?;
    Ok(H256::from_slice(&bytes))
}

/// Everything a command needs to run
pub struct CommandContext {
    pub chain: Arc<dyn ChainClient>,
    pub stager: Arc<TxStager>,
    pub operator: Address,
    /// Block explorer transaction URL prefix, e.g. https://etherscan.io/tx
    pub explorer_tx_url: String,
    /// Prefix for saved simulation links
    pub simulation_dashboard_url: Option<String>,
}

impl CommandContext {
    pub fn explorer_link(&self, tx_hash: H256) -> String {
        format!("{}/{:?}", self.explorer_tx_url.trim_end_matches('/'), tx_hash)
    }

    pub fn simulation_link(&self, simulation_id: &str) -> Option<String> {
        self.simulation_dashboard_url
            .as_ref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), simulation_id))
    }
}

/// Execute a command and return the reply text
pub async fn execute(cmd: Command, ctx: &CommandContext) -> Result<String, QuickTaskError> {
    match cmd {
        Command::Balance => balance::execute(ctx).await,
        Command::Stage(hash) => quicktask::execute(hash, ctx).await,
        Command::Confirm => confirm::execute(ctx).await,
        Command::Reject => clear::execute(ctx),
        Command::Pending => Ok(pending::execute(ctx)),
        Command::Help => Ok(help::execute()),
    }
}

/// Parse and execute one message; `None` when the text is not a command
pub async fn handle_text(text: &str, ctx: &CommandContext) -> Option<String> {
    let reply = match parse(text) {
        Ok(Some(cmd)) => {
            log::info!("Commands: Executing {:?}", cmd);
            execute(cmd, ctx).await
        }
        Ok(None) => return None,
        Err(e) => Err(e),
    };

    Some(reply.unwrap_or_else(|e| {
        log::error!("Commands: {}", e);
        e.to_chat_message()
    }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::mocks::{sample_template, MockChain, MockSender, MockSimulator};

    pub struct TestContext {
        pub chain: Arc<MockChain>,
        pub simulator: Arc<MockSimulator>,
        pub sender: Arc<MockSender>,
        pub ctx: CommandContext,
    }

    pub fn context() -> TestContext {
        context_with_sender(MockSender::new())
    }

    pub fn context_with_sender(sender: MockSender) -> TestContext {
        let chain = Arc::new(MockChain::new());
        chain.insert_template(sample_template(0xab));
        chain.insert_template(sample_template(0xde));
        let simulator = Arc::new(MockSimulator::new());
        let sender = Arc::new(sender);
        let operator = Address::repeat_byte(0x33);
        let stager = Arc::new(TxStager::new(
            chain.clone(),
            simulator.clone(),
            sender.clone(),
            operator,
        ));
        let ctx = CommandContext {
            chain: chain.clone(),
            stager,
            operator,
            explorer_tx_url: "https://etherscan.io/tx".to_string(),
            simulation_dashboard_url: Some(
                "https://dashboard.tenderly.co/alice/quicktask/simulator".to_string(),
            ),
        };
        TestContext {
            chain,
            simulator,
            sender,
            ctx,
        }
    }

    pub fn hash_text(byte: u8) -> String {
        format!("{:?}", H256::repeat_byte(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{context, hash_text};
    use super::*;

    #[test]
    fn test_parse_balance() {
        assert_eq!(parse("!balance").unwrap(), Some(Command::Balance));
        assert_eq!(parse("!BALANCE").unwrap(), Some(Command::Balance));
    }

    #[test]
    fn test_parse_quicktask() {
        let text = format!("!qt {}", hash_text(0xab));
        assert_eq!(
            parse(&text).unwrap(),
            Some(Command::Stage(H256::repeat_byte(0xab)))
        );
        // Case-insensitive command, mixed-case hex
        let text = format!("!QT 0x{}", "AB".repeat(32));
        assert_eq!(
            parse(&text).unwrap(),
            Some(Command::Stage(H256::repeat_byte(0xab)))
        );
    }

    #[test]
    fn test_parse_quicktask_missing_hash() {
        assert!(matches!(parse("!qt"), Err(QuickTaskError::MalformedRequest(_))));
        assert!(matches!(parse("!qt   "), Err(QuickTaskError::MalformedRequest(_))));
    }

    #[test]
    fn test_parse_quicktask_bad_hash() {
        assert!(matches!(parse("!qt 0xabc"), Err(QuickTaskError::MalformedRequest(_))));
        let not_hex = format!("!qt 0x{}", "zz".repeat(32));
        assert!(matches!(parse(&not_hex), Err(QuickTaskError::MalformedRequest(_))));
    }

    #[test]
    fn test_parse_confirm_reject() {
        assert_eq!(parse("y").unwrap(), Some(Command::Confirm));
        assert_eq!(parse("Y").unwrap(), Some(Command::Confirm));
        assert_eq!(parse(" n ").unwrap(), Some(Command::Reject));
        assert_eq!(parse("N").unwrap(), Some(Command::Reject));
        // Only the bare letters count
        assert_eq!(parse("yes").unwrap(), None);
        assert_eq!(parse("no thanks").unwrap(), None);
    }

    #[test]
    fn test_parse_extras() {
        assert_eq!(parse("!pending").unwrap(), Some(Command::Pending));
        assert_eq!(parse("!help").unwrap(), Some(Command::Help));
    }

    #[test]
    fn test_parse_ignores_chatter() {
        assert_eq!(parse("hello there").unwrap(), None);
        assert_eq!(parse("!unknown").unwrap(), None);
        assert_eq!(parse("").unwrap(), None);
    }

    #[test]
    fn test_parse_tx_hash_without_prefix() {
        assert_eq!(
            parse_tx_hash(&"ab".repeat(32)).unwrap(),
            H256::repeat_byte(0xab)
        );
    }

    #[test]
    fn test_explorer_link() {
        let t = context();
        assert_eq!(
            t.ctx.explorer_link(H256::repeat_byte(0x01)),
            format!("https://etherscan.io/tx/{}", hash_text(0x01))
        );
    }

    #[tokio::test]
    async fn test_handle_text_ignores_non_commands() {
        let t = context();
        assert!(handle_text("gm", &t.ctx).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_request_makes_no_network_call() {
        let t = context();
        let reply = handle_text("!qt", &t.ctx).await.unwrap();
        assert_eq!(reply, format!("Error: malformed request: {}", QUICKTASK_USAGE));
        assert_eq!(t.chain.total_calls(), 0);
        assert_eq!(t.simulator.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let t = context();

        let prompt = handle_text(&format!("!qt {}", hash_text(0xab)), &t.ctx)
            .await
            .unwrap();
        assert!(prompt.contains("(y/n)"));

        let sent = handle_text("y", &t.ctx).await.unwrap();
        assert!(sent.starts_with("Transaction sent!"));
        assert_eq!(t.sender.sent().len(), 1);

        let again = handle_text("y", &t.ctx).await.unwrap();
        assert_eq!(again, "Error: no pending transaction");
    }
}
