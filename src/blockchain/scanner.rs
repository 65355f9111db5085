use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::time::sleep;

use crate::blockchain::chain_reader::{format_block_number, ChainReader};
use crate::blockchain::units::{format_ether, wei_hex_to_ether};
use crate::error::ScannerError;
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{Block, MatchedTransaction, ScanRange, ScanSummary};

/// Pause between consecutive block fetches
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed interval on the tokio timer
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            sleep(self.0).await;
        }
    }
}

/// Receives every transaction that touched the scanned address
pub trait MatchSink: Send + Sync {
    fn emit(&self, matched: &MatchedTransaction);
}

impl<F> MatchSink for F
where
    F: Fn(&MatchedTransaction) + Send + Sync,
{
    fn emit(&self, matched: &MatchedTransaction) {
        self(matched)
    }
}

/// Writes each match as one line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl MatchSink for ConsoleSink {
    fn emit(&self, matched: &MatchedTransaction) {
        println!("{}", matched.report_line());
    }
}

/// Sequential block-range scanner.
///
/// Blocks are fetched one at a time in ascending order. A block that cannot
/// be fetched is logged and skipped; the walk always reaches the end of the
/// range.
#[derive(Clone)]
pub struct BlockScanner {
    reader: Arc<dyn ChainReader>,
    pacer: Arc<dyn Pacer>,
    sink: Arc<dyn MatchSink>,
}

impl BlockScanner {
    pub fn new(reader: Arc<dyn ChainReader>, pacer: Arc<dyn Pacer>, sink: Arc<dyn MatchSink>) -> Self {
        Self { reader, pacer, sink }
    }

    pub fn reader(&self) -> &Arc<dyn ChainReader> {
        &self.reader
    }

    pub async fn scan(&self, address: &str, range: ScanRange) -> ScanSummary {
        let started = Instant::now();
        let mut summary = ScanSummary::default();

        LogContext::new("scanner", "scan")
            .with_address(address)
            .with_metadata("start_block", serde_json::json!(range.start_block))
            .with_metadata("end_block", serde_json::json!(range.end_block))
            .with_metadata("block_count", serde_json::json!(range.len()))
            .info(&format!(
                "Scanning {} blocks ({} to {}) for {}",
                range.len(),
                range.start_block,
                range.end_block,
                address
            ));

        for block_number in range.blocks() {
            let block_hex = format_block_number(block_number);

            match self.reader.get_block_by_number(&block_hex).await {
                Ok(block) => {
                    let matches = self.emit_matches(address, &block);
                    summary.blocks_scanned += 1;
                    summary.matches += matches;
                    MetricsLogger::log_block_scanned(block_number, block.transactions.len(), matches);
                }
                Err(e) => {
                    summary.blocks_skipped += 1;
                    let context = LogContext::new("scanner", "fetch_block")
                        .with_block_number(block_number)
                        .with_metadata("block_hex", serde_json::json!(block_hex));
                    ErrorLogger::log_error(&ScannerError::from(e), Some(context));
                }
            }

            if block_number < range.end_block {
                self.pacer.pause().await;
            }
        }

        MetricsLogger::log_scan_completed(address, &summary, started.elapsed().as_millis() as u64);
        summary
    }

    fn emit_matches(&self, address: &str, block: &Block) -> u64 {
        let mut matches = 0;

        for tx in block.transactions.iter().filter(|tx| tx.touches(address)) {
            let value_ether = wei_hex_to_ether(&tx.value).unwrap_or_else(|e| {
                let context = LogContext::new("scanner", "convert_value").with_transaction_hash(&tx.hash);
                ErrorLogger::log_error(&ScannerError::from(e), Some(context));
                format_ether(0)
            });

            self.sink.emit(&MatchedTransaction::new(block, tx, value_ether));
            matches += 1;
        }

        matches
    }
}
