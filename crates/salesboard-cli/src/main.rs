use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = salesboard_cli::Cli::parse();
    salesboard_cli::init_tracing(cli.log_json())?;
    salesboard_cli::run_cli(cli)
}
