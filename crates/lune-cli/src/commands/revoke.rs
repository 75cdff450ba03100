//! `lune revoke`: revoke a credential held in an owner's wallet.

use clap::Args;
use serde::Deserialize;

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Owner (user) id.
    #[arg(short, long)]
    pub owner: String,

    /// Credential id to revoke.
    #[arg(short, long)]
    pub credential: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct RevokeResponse {
    revoked: bool,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let url = format!(
        "{}/api/v1/wallets/{}/credentials/{}/revoke",
        args.endpoint, args.owner, args.credential
    );

    let client = reqwest::Client::new();
    match client.post(&url).send().await {
        Ok(r) => {
            let data: RevokeResponse = decode(r, "revocation").await?;
            if data.revoked {
                println!("Credential {} is revoked", args.credential);
            } else {
                anyhow::bail!("credential {} not found in {}'s wallet", args.credential, args.owner);
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
