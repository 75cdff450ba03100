//! `lune init`: write a default node configuration.

use clap::Args;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"[api]
listen_addr = "127.0.0.1"
port = 9101

[storage]
backend = "rocksdb"
data_dir = "./data"

[ledger]
mode = "simulated"

[logging]
level = "info"
format = "text"

[identity]
issuer_key_path = "./data/issuer.key"

[service]
did_namespace = "lune"

[service.anchor]
network = "polygon-amoy"
timeout_ms = 5000
max_retries = 1
fallback = "fail"
"#;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the configuration.
    #[arg(short, long, default_value = "lune.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }
    std::fs::write(&args.output, DEFAULT_CONFIG)?;
    println!("Wrote {}", args.output.display());
    println!("Start the node with: lune-node --config {}", args.output.display());
    Ok(())
}
