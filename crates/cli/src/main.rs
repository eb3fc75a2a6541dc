//! # pharmalens-cli: The Document Scanner
//!
//! Extracts text from local documents (PDF, image, plain text) or takes
//! pasted text, submits it to the server's summarization endpoint, and
//! falls back to the local sentence-splitting summarizer when the server
//! is unreachable.

mod api_client;
mod ocr;
mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the pharmalens server.
    #[arg(
        long,
        env = "PHARMALENS_SERVER_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    server: String,

    /// Bearer token for authenticated submissions. Without it, reports are
    /// filed under the guest user.
    #[arg(long, env = "PHARMALENS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text from documents and summarize it
    Scan(ScanArgs),
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Files to scan (PDF, image, or plain text), processed one at a time
    files: Vec<PathBuf>,

    /// Summarize pasted text instead of files
    #[arg(long, conflicts_with = "files")]
    text: Option<String>,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to a file so scan output stays readable on stdout.
    let log_file = File::create("pharmalens-cli.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match &cli.command {
        Commands::Scan(args) => {
            let client = api_client::ApiClient::new(cli.server.clone(), cli.token.clone())?;

            if let Some(text) = &args.text {
                match scan::scan_text(&client, text).await {
                    Ok(outcome) => scan::print_outcome(&outcome),
                    Err(e) => eprintln!("Scan failed: {e}"),
                }
            } else if args.files.is_empty() {
                eprintln!("Nothing to scan: pass one or more files, or --text.");
            } else {
                let outcomes =
                    scan::scan_files(&client, &args.files, scan::print_outcome).await;
                println!("Scan complete: {} file(s) processed", outcomes.len());
            }
        }
    }

    Ok(())
}
