pub mod commands;
pub mod interactions;
pub mod oauth;

use std::time::Duration;

use crate::core::errors::{Result, ShopkeeperError};

/// Discord REST base URL.
pub const DISCORD_API: &str = "https://discord.com/api/v10";

/// Timeout for every outbound Discord call. Nothing is retried.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a reqwest client for Discord calls.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(format!("DiscordBot (shopkeeper, {})", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| upstream(format!("Failed to create HTTP client: {e}")))
}

pub(crate) fn upstream(reason: impl Into<String>) -> ShopkeeperError {
    ShopkeeperError::UpstreamFailure {
        service: "Discord".into(),
        reason: reason.into(),
    }
}
