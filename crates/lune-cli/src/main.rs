//! Lune CLI: command-line client for a running Lune node.
//!
//! Subcommands: init, status, wallet, export, import, issue, revoke, verify,
//! present, view, explorer.

mod commands;

use clap::{Parser, Subcommand};

/// Lune: skill credentials anchored to DIDs.
#[derive(Parser, Debug)]
#[command(name = "lune", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default node configuration file.
    Init(commands::init::InitArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Create or show the wallet of an owner.
    Wallet(commands::wallet::WalletArgs),
    /// Export a wallet as JSON.
    Export(commands::export::ExportArgs),
    /// Validate an exported wallet file.
    Import(commands::import::ImportArgs),
    /// Issue a skill credential into an owner's wallet.
    Issue(commands::issue::IssueArgs),
    /// Revoke a credential.
    Revoke(commands::revoke::RevokeArgs),
    /// Run the verification checks on a credential.
    Verify(commands::verify::VerifyArgs),
    /// Create a shareable presentation.
    Present(commands::present::PresentArgs),
    /// Open a shareable presentation.
    View(commands::view::ViewArgs),
    /// Print the block explorer link of a credential.
    Explorer(commands::explorer::ExplorerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Wallet(args) => commands::wallet::run(args).await,
        Commands::Export(args) => commands::export::run(args).await,
        Commands::Import(args) => commands::import::run(args).await,
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Present(args) => commands::present::run(args).await,
        Commands::View(args) => commands::view::run(args).await,
        Commands::Explorer(args) => commands::explorer::run(args).await,
    }
}
