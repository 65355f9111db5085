use clap::Parser;
use eth_tx_scanner::api::{ApiServer, AppState};
use eth_tx_scanner::blockchain::{BlockScanner, ConsoleSink, FixedDelay, RpcClient};
use eth_tx_scanner::config::AppConfig;
use eth_tx_scanner::logging::init_logging;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "eth-tx-scanner-server")]
#[command(about = "HTTP trigger for background Ethereum transaction scans")]
#[command(version)]
struct Args {
    /// Bind address, overrides configuration
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides configuration
    #[arg(long)]
    port: Option<u16>,

    /// JSON-RPC endpoint, overrides configuration
    #[arg(long)]
    rpc_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(rpc_url) = args.rpc_url {
        config.rpc.endpoint = rpc_url;
    }
    config.validate()?;

    init_logging(&config.logging);

    let rpc_client = RpcClient::new_with_timeout(config.rpc.endpoint.clone(), config.rpc.timeout_seconds)?;
    let scanner = BlockScanner::new(
        Arc::new(rpc_client),
        Arc::new(FixedDelay(config.scanner.block_delay())),
        Arc::new(ConsoleSink),
    );

    let server = ApiServer::new(
        AppState { scanner: Arc::new(scanner) },
        config.api.host.clone(),
        config.api.port,
    );

    log::info!("Server is running on port {}...", config.api.port);

    if let Err(e) = server.start().await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
