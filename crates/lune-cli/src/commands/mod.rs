pub mod explorer;
pub mod export;
pub mod import;
pub mod init;
pub mod issue;
pub mod present;
pub mod revoke;
pub mod status;
pub mod verify;
pub mod view;
pub mod wallet;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Decode a successful response, or turn the node's error body into an error.
pub async fn decode<T: DeserializeOwned>(resp: reqwest::Response, action: &str) -> anyhow::Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    match resp.json::<ErrorResponse>().await {
        Ok(err) => anyhow::bail!("{} failed (HTTP {}): {}", action, status, err.error),
        Err(_) => anyhow::bail!("{} failed (HTTP {})", action, status),
    }
}

pub fn report_unreachable(endpoint: &str, e: &reqwest::Error) {
    println!("Could not reach node at {}", endpoint);
    println!("  Error: {}", e);
}
