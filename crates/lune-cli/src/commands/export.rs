//! `lune export`: export a wallet as JSON.

use clap::Args;
use std::path::PathBuf;

use super::{report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Owner (user) id.
    #[arg(short, long)]
    pub owner: String,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &ExportArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/wallets/{}/export", args.endpoint, args.owner);
    match reqwest::get(&url).await {
        Ok(r) if r.status().is_success() => {
            let body = r.text().await?;
            match &args.out {
                Some(path) => {
                    std::fs::write(path, &body)?;
                    eprintln!("Wallet exported to {}", path.display());
                    eprintln!("The export contains the wallet private key. Store it safely.");
                }
                None => println!("{}", body),
            }
        }
        Ok(r) => anyhow::bail!("export failed (HTTP {})", r.status()),
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
