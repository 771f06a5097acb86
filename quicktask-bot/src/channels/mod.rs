//! Chat transport

pub mod discord;
pub mod util;

pub use discord::start_discord_listener;
