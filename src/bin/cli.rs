use clap::Parser;
use eth_tx_scanner::api::{Cli, CliHandler};
use eth_tx_scanner::blockchain::RpcClient;
use eth_tx_scanner::config::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Quieter than the server; scan output goes to stdout
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(rpc_url) = cli.rpc_url.clone() {
        config.rpc.endpoint = rpc_url;
        config.validate()?;
    }

    let rpc_client = RpcClient::new_with_timeout(config.rpc.endpoint.clone(), config.rpc.timeout_seconds)?;
    let handler = CliHandler::new(Arc::new(rpc_client), config.scanner.block_delay());

    if let Err(e) = handler.execute_command(&cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
