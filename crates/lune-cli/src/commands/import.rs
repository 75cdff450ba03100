//! `lune import`: validate an exported wallet file against the node.

use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to an exported wallet JSON file.
    #[arg(short, long)]
    pub file: PathBuf,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportResponse {
    wallet_id: String,
    did: String,
    credentials: usize,
}

pub async fn run(args: &ImportArgs) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(&args.file)?;
    let url = format!("{}/api/v1/wallets/import", args.endpoint);

    let client = reqwest::Client::new();
    match client.post(&url).body(body).send().await {
        Ok(r) => {
            let data: ImportResponse = decode(r, "import").await?;
            println!("Wallet file is valid");
            println!("  Wallet ID:   {}", data.wallet_id);
            println!("  DID:         {}", data.did);
            println!("  Credentials: {}", data.credentials);
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
