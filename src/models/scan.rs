use serde::{Deserialize, Serialize};

use crate::models::{Block, Transaction};

/// Inclusive block range to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRange {
    pub start_block: u64,
    pub end_block: u64,
}

impl ScanRange {
    pub fn new(start_block: u64, end_block: u64) -> Self {
        Self { start_block, end_block }
    }

    /// Never extend past known chain state. The start is left alone.
    pub fn clamp_to_head(self, latest_block: u64) -> Self {
        Self {
            start_block: self.start_block,
            end_block: self.end_block.min(latest_block),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_block > self.end_block
    }

    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end_block - self.start_block + 1
        }
    }

    pub fn blocks(&self) -> std::ops::RangeInclusive<u64> {
        self.start_block..=self.end_block
    }
}

/// One transaction that touched the scanned address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedTransaction {
    /// Block number as reported by the node (hex)
    pub block_number: String,
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    /// Decimal ether, six fractional digits
    pub value_ether: String,
}

impl MatchedTransaction {
    pub fn new(block: &Block, tx: &Transaction, value_ether: String) -> Self {
        Self {
            block_number: block.number.clone(),
            hash: tx.hash.clone(),
            from: tx.from.clone(),
            to: tx.to.clone(),
            value_ether,
        }
    }

    /// Single-line report written to the console sink
    pub fn report_line(&self) -> String {
        format!(
            "Transaction: Block {} | Hash: {} | From: {} | To: {} | Value: {} ETH",
            self.block_number,
            self.hash,
            self.from,
            self.to.as_deref().unwrap_or(""),
            self.value_ether
        )
    }
}

/// Counters for a finished scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub blocks_scanned: u64,
    pub blocks_skipped: u64,
    pub matches: u64,
}
