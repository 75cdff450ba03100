//! `lune status`: query the status of a running node.

use clap::Args;
use serde::Deserialize;

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusResponse {
    version: String,
    issuer_did: String,
    network: String,
    wallets: usize,
    presentations: usize,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);
    match reqwest::get(&url).await {
        Ok(r) => {
            let status: StatusResponse = decode(r, "status").await?;
            println!("Node Status:");
            println!("  Version:        {}", status.version);
            println!("  Issuer:         {}", status.issuer_did);
            println!("  Network:        {}", status.network);
            println!("  Wallets:        {}", status.wallets);
            println!("  Presentations:  {}", status.presentations);
            println!("  Uptime:         {}s", status.uptime_secs);
        }
        Err(e) => {
            report_unreachable(&args.endpoint, &e);
            println!();
            println!("Is the node running? Start it with: lune-node");
        }
    }
    Ok(())
}
