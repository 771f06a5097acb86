//! Pending transaction staging
//!
//! Holds at most one transaction awaiting operator confirmation.
//!
//! ## Flow
//! 1. `stage(hash)` fetches the transaction, simulates it and, only if the simulation
//!    succeeds, puts it in the slot (replacing anything already there)
//! 2. `confirm()` hands the staged template to the broadcaster
//! 3. `reject()` clears the slot
//! 4. An expiry task clears the slot after the staging timeout
//!
//! Whichever of confirm, reject or expiry comes first removes the entry; the others
//! find a different generation (or nothing) and do nothing.

mod manager;
mod types;

pub use manager::{TxStager, DEFAULT_STAGE_TIMEOUT};
pub use types::TransactionTemplate;
