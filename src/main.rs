use anyhow::Context;
use clap::Parser;
use tracing::debug;

use symlinker::cli::Cli;
use symlinker::config::{get_config, init_config};
use symlinker::interfaces::cli::run_cli_command;
use symlinker::system::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let config = get_config();

    // 日志写入是非阻塞的，guard 需要一直持有到退出前
    let guard = init_logging(&config.logging);
    debug!("Configuration loaded: {:?}", config);

    if let Err(e) = run_cli_command(cli.command, &config).await {
        eprintln!("{}", e.format_colored());
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}
