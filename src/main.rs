use anyhow::Result;
use clap::Parser;
use transcript_rag_cli::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args).await
}
