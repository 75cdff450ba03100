//! `lune view`: open a shareable presentation.

use clap::Args;
use serde::Deserialize;

use super::{report_unreachable, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Presentation id.
    #[arg(short, long)]
    pub id: String,

    /// Access code, if the presentation has one.
    #[arg(short, long)]
    pub code: Option<String>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresentationResponse {
    holder: String,
    views: u64,
    credentials: Vec<PresentedCredential>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresentedCredential {
    id: String,
    status: String,
    credential_subject: serde_json::Value,
}

pub async fn run(args: &ViewArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/presentations/{}", args.endpoint, args.id);
    let mut query = Vec::new();
    if let Some(code) = &args.code {
        query.push(("code", code.as_str()));
    }

    let client = reqwest::Client::new();
    match client.get(&url).query(&query).send().await {
        Ok(r) if r.status() == reqwest::StatusCode::NOT_FOUND => {
            println!("Presentation not available (unknown, expired or wrong access code)");
        }
        Ok(r) if r.status().is_success() => {
            let data: PresentationResponse = r.json().await?;
            println!("Holder: {}", data.holder);
            println!("Views:  {}", data.views);
            println!();
            for credential in &data.credentials {
                let subject = &credential.credential_subject;
                let title = subject["skill"]
                    .as_str()
                    .or_else(|| subject["assessment"].as_str())
                    .unwrap_or("-");
                println!(
                    "  {} [{}] {} score {}",
                    credential.id,
                    credential.status,
                    title,
                    subject["score"]
                );
            }
        }
        Ok(r) => anyhow::bail!("node returned HTTP {}", r.status()),
        Err(e) => report_unreachable(&args.endpoint, &e),
    }
    Ok(())
}
