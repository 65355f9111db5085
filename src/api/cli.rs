use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::blockchain::{BlockScanner, ChainError, ChainReader, ConsoleSink, FixedDelay};
use crate::config::AppConfig;
use crate::error::ConfigError;
use crate::models::{ScanRange, ScanSummary};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Error fetching latest block number: {0}")]
    ChainHead(#[from] ChainError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Parser)]
#[command(name = "eth-tx-scanner")]
#[command(about = "Scan an Ethereum block range for transactions touching an address")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC endpoint, overrides configuration
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Scan a block range in the foreground and print matches
    Scan {
        /// Address compared exactly against sender and recipient
        #[arg(long)]
        address: String,
        #[arg(long)]
        start_block: u64,
        #[arg(long)]
        end_block: u64,
        /// Pause between blocks, overrides configuration
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Print the current chain head
    LatestBlock,
    /// Print a configuration file with default values
    SampleConfig,
}

pub struct CliHandler {
    reader: Arc<dyn ChainReader>,
    block_delay: Duration,
}

impl CliHandler {
    pub fn new(reader: Arc<dyn ChainReader>, block_delay: Duration) -> Self {
        Self { reader, block_delay }
    }

    pub async fn execute_command(&self, command: &Commands) -> Result<(), CliError> {
        match command {
            Commands::Scan { address, start_block, end_block, delay_ms } => {
                let delay = (*delay_ms).map(Duration::from_millis).unwrap_or(self.block_delay);
                let summary = self
                    .scan(address, ScanRange::new(*start_block, *end_block), delay)
                    .await?;
                println!(
                    "Scanned {} blocks ({} skipped), {} matching transactions",
                    summary.blocks_scanned, summary.blocks_skipped, summary.matches
                );
            }
            Commands::LatestBlock => {
                println!("{}", self.reader.get_latest_block_number().await?);
            }
            Commands::SampleConfig => {
                println!("{}", AppConfig::generate_sample_config()?);
            }
        }
        Ok(())
    }

    /// Clamp to the chain head and scan in the foreground
    pub async fn scan(&self, address: &str, range: ScanRange, delay: Duration) -> Result<ScanSummary, CliError> {
        let latest_block = self.reader.get_latest_block_number().await?;
        let range = range.clamp_to_head(latest_block);

        println!(
            "Fetching transactions for address: {} from block {} to {}",
            address, range.start_block, range.end_block
        );

        let scanner = BlockScanner::new(self.reader.clone(), Arc::new(FixedDelay(delay)), Arc::new(ConsoleSink));
        Ok(scanner.scan(address, range).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_command() {
        let cli = Cli::try_parse_from([
            "cli",
            "--rpc-url",
            "http://localhost:8545",
            "scan",
            "--address",
            "0xabc",
            "--start-block",
            "95",
            "--end-block",
            "200",
        ])
        .unwrap();

        assert_eq!(cli.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(
            cli.command,
            Commands::Scan {
                address: "0xabc".to_string(),
                start_block: 95,
                end_block: 200,
                delay_ms: None,
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_numeric_block() {
        let result = Cli::try_parse_from(["cli", "scan", "--address", "0xabc", "--start-block", "abc", "--end-block", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_latest_block() {
        let cli = Cli::try_parse_from(["cli", "latest-block"]).unwrap();
        assert_eq!(cli.command, Commands::LatestBlock);
        assert!(cli.rpc_url.is_none());
    }
}
