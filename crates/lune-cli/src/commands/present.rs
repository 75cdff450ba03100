//! `lune present`: create a shareable presentation.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Owner (user) id.
    #[arg(short, long)]
    pub owner: String,

    /// Credential ids to include (repeatable).
    #[arg(short, long = "credential", required = true)]
    pub credentials: Vec<String>,

    /// Hours until the link expires.
    #[arg(long)]
    pub expires_in_hours: Option<u32>,

    /// Protect the link with an access code.
    #[arg(long)]
    pub access_code: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresentRequest {
    owner_id: String,
    credential_ids: Vec<String>,
    expires_in_hours: Option<u32>,
    require_access_code: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresentationResponse {
    id: String,
    access_url: String,
    access_code: Option<String>,
    expires_at: Option<String>,
    credentials: Vec<serde_json::Value>,
}

pub async fn run(args: &PresentArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/presentations", args.endpoint);
    let body = PresentRequest {
        owner_id: args.owner.clone(),
        credential_ids: args.credentials.clone(),
        expires_in_hours: args.expires_in_hours,
        require_access_code: args.access_code,
    };

    let client = reqwest::Client::new();
    match client.post(&url).json(&body).send().await {
        Ok(r) => {
            let data: PresentationResponse = decode(r, "presentation").await?;
            println!("Presentation created!");
            println!("  ID:           {}", data.id);
            println!("  URL:          {}", data.access_url);
            println!("  Credentials:  {}", data.credentials.len());
            if let Some(code) = &data.access_code {
                println!("  Access code:  {}", code);
            }
            println!("  Expires:      {}", data.expires_at.as_deref().unwrap_or("never"));
            if data.credentials.len() < args.credentials.len() {
                println!();
                println!("Some requested credentials are not in this wallet and were left out.");
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
