//! ASR CLI - Command line tool for airport safety inspection reports.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "asr-cli",
    version,
    about = "Airport safety inspection report toolkit"
)]
struct Cli {
    #[command(flatten)]
    config: asr_cmd::Config,

    #[command(subcommand)]
    command: asr_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("config: {:?}", cli.config);
    asr_cmd::run(&cli.config, cli.command).await
}
