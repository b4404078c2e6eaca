//! Shared HTTP client construction for the service clients.

use reqwest::Client;
use std::time::Duration;

/// User-Agent string identifying this tool
const USER_AGENT: &str = concat!("textquiz/", env!("CARGO_PKG_VERSION"));

/// Create a configured HTTP client
pub fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

/// Join a base URL and a path without doubling or dropping the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
