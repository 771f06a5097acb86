use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

/// Timeout applied to every RPC and simulation request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Global shared HTTP client singleton.
///
/// Reuses a single connection pool for the simulation API and the JSON-RPC endpoint.
/// `Client::clone()` is just an `Arc` increment.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    build_client().unwrap_or_else(|e| {
        log::error!("Failed to build HTTP client with custom settings: {}", e);
        Client::new()
    })
});

fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(5)
        .pool_idle_timeout(Duration::from_secs(90))
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Returns a reference to the global shared HTTP client.
pub fn shared_client() -> &'static Client {
    &SHARED_CLIENT
}
