use clap::Parser;

mod cli;
mod client;
mod commands;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.log_format, cli.verbose);
    commands::run_command(cli).await
}
