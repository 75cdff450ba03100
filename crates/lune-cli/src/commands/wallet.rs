//! `lune wallet`: create or show an owner's wallet.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct WalletArgs {
    /// Owner (user) id.
    #[arg(short, long)]
    pub owner: String,

    /// Only show an existing wallet, never create one.
    #[arg(long)]
    pub show: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateWalletRequest {
    owner_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WalletResponse {
    wallet_id: String,
    did: String,
    public_key: String,
    credentials: Vec<CredentialSummary>,
    created_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialSummary {
    id: String,
    #[serde(rename = "type")]
    credential_type: Vec<String>,
    status: String,
}

pub async fn run(args: &WalletArgs) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let resp = if args.show {
        client
            .get(format!("{}/api/v1/wallets/{}", args.endpoint, args.owner))
            .send()
            .await
    } else {
        client
            .post(format!("{}/api/v1/wallets", args.endpoint))
            .json(&CreateWalletRequest {
                owner_id: args.owner.clone(),
            })
            .send()
            .await
    };

    match resp {
        Ok(r) => {
            let wallet: WalletResponse = decode(r, "wallet lookup").await?;
            println!("Wallet:");
            println!("  ID:          {}", wallet.wallet_id);
            println!("  DID:         {}", wallet.did);
            println!("  Public key:  {}", wallet.public_key);
            println!("  Created:     {}", wallet.created_at);
            println!("  Credentials: {}", wallet.credentials.len());
            for credential in &wallet.credentials {
                println!(
                    "    {} [{}] {}",
                    credential.id,
                    credential.status,
                    credential.credential_type.join(", ")
                );
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
