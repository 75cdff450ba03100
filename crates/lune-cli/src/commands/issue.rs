//! `lune issue`: issue a skill credential into an owner's wallet.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{decode, report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Owner (user) id. A wallet is created if the owner has none.
    #[arg(short, long)]
    pub owner: String,

    /// Display name of the credential subject.
    #[arg(short, long)]
    pub name: String,

    /// Assessed skill, e.g. "React".
    #[arg(short, long)]
    pub skill: String,

    /// Assessment score (0-100).
    #[arg(long)]
    pub score: u32,

    /// Skill level: beginner, intermediate, advanced or expert.
    #[arg(short, long)]
    pub level: String,

    /// Expiration timestamp (RFC 3339).
    #[arg(long)]
    pub expires_at: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueRequest {
    subject_name: String,
    skill: String,
    score: u32,
    level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuedCredential {
    id: String,
    issuer: String,
    issuance_date: String,
    credential_subject: serde_json::Value,
    anchor: Option<serde_json::Value>,
}

pub async fn run(args: &IssueArgs) -> anyhow::Result<()> {
    if args.score > 100 {
        anyhow::bail!("score must be between 0 and 100");
    }

    let url = format!("{}/api/v1/wallets/{}/credentials", args.endpoint, args.owner);
    let body = IssueRequest {
        subject_name: args.name.clone(),
        skill: args.skill.clone(),
        score: args.score,
        level: args.level.clone(),
        expires_at: args.expires_at.clone(),
    };

    let client = reqwest::Client::new();
    match client.post(&url).json(&body).send().await {
        Ok(r) => {
            let vc: IssuedCredential = decode(r, "issuance").await?;
            println!("Credential issued!");
            println!("  ID:       {}", vc.id);
            println!("  Issuer:   {}", vc.issuer);
            println!("  Issued:   {}", vc.issuance_date);
            println!("  Holder:   {}", vc.credential_subject["id"].as_str().unwrap_or("-"));
            if let Some(anchor) = vc.anchor {
                println!(
                    "  Anchor:   {} tx {}",
                    anchor["network"].as_str().unwrap_or("-"),
                    anchor["transactionHash"].as_str().unwrap_or("-")
                );
            }
        }
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
