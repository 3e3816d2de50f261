use anyhow::Result;
use clap::Parser;
use fairshare::cli::Cli;
use fairshare::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    init_tracing(config.verbose);
    cli.run(config).await
}
