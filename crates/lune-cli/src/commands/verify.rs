//! `lune verify`: run the verification checks on a credential.

use clap::Args;
use serde::Deserialize;

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential id.
    #[arg(short, long)]
    pub credential: String,

    /// Expected holder DID.
    #[arg(long)]
    pub holder: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    is_valid: bool,
    checks: Vec<VerifyCheck>,
    issuer: Option<IssuerSummary>,
}

#[derive(Deserialize)]
struct VerifyCheck {
    name: String,
    status: String,
    detail: Option<String>,
}

#[derive(Deserialize)]
struct IssuerSummary {
    name: String,
    verified: bool,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/credentials/{}/verify", args.endpoint, args.credential);
    let mut query = Vec::new();
    if let Some(holder) = &args.holder {
        query.push(("holder", holder.as_str()));
    }

    let client = reqwest::Client::new();
    match client.get(&url).query(&query).send().await {
        Ok(r) => {
            let data: VerifyResponse = decode(r, "verification").await?;
            if data.is_valid {
                println!("Credential is VALID");
            } else {
                println!("Credential is INVALID");
            }
            if let Some(issuer) = &data.issuer {
                let trust = if issuer.verified { "trusted" } else { "untrusted" };
                println!("Issuer: {} ({})", issuer.name, trust);
            }
            println!();
            for check in &data.checks {
                print!("  [{}] {}", check.status.to_uppercase(), check.name);
                if let Some(ref detail) = check.detail {
                    print!(": {}", detail);
                }
                println!();
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
