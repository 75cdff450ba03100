//! `lune explorer`: print the block explorer link of a credential.

use clap::Args;
use serde::Deserialize;

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ExplorerArgs {
    /// Credential id.
    #[arg(short, long)]
    pub credential: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct ExplorerResponse {
    url: String,
}

pub async fn run(args: &ExplorerArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/credentials/{}/explorer", args.endpoint, args.credential);
    match reqwest::get(&url).await {
        Ok(r) => {
            let data: ExplorerResponse = decode(r, "explorer lookup").await?;
            if data.url == "#" {
                println!("Credential {} is not anchored on a public chain", args.credential);
            } else {
                println!("{}", data.url);
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
