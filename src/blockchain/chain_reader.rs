use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::blockchain::rpc_client::{RpcClient, RpcError};
use crate::logging::LogContext;
use crate::models::Block;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("{0}")]
    Rpc(#[from] RpcError),
    #[error("invalid response format: {0}")]
    Format(String),
    #[error("failed to parse hex quantity: {0}")]
    Parse(String),
    #[error("failed to decode block: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("block {0} not found")]
    BlockNotFound(String),
}

/// Read access to chain state needed by the scanner
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current chain head
    async fn get_latest_block_number(&self) -> Result<u64, ChainError>;

    /// Full block, transactions included, for a `0x`-prefixed block number
    async fn get_block_by_number(&self, block_number_hex: &str) -> Result<Block, ChainError>;
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn get_latest_block_number(&self) -> Result<u64, ChainError> {
        let result = self.call("eth_blockNumber", vec![]).await?;

        let hex_string = result
            .as_str()
            .ok_or_else(|| ChainError::Format("block number is not a string".to_string()))?;

        let block_number = parse_hex_quantity(hex_string)?;

        LogContext::new("chain_reader", "get_latest_block_number")
            .with_block_number(block_number)
            .debug(&format!("Retrieved latest block number: {}", block_number));

        Ok(block_number)
    }

    async fn get_block_by_number(&self, block_number_hex: &str) -> Result<Block, ChainError> {
        let params = vec![
            Value::String(block_number_hex.to_string()),
            Value::Bool(true), // full transaction objects
        ];

        let result = self.call("eth_getBlockByNumber", params).await?;

        if result.is_null() {
            return Err(ChainError::BlockNotFound(block_number_hex.to_string()));
        }

        let block: Block = serde_json::from_value(result)?;

        LogContext::new("chain_reader", "get_block_by_number")
            .with_metadata("block_number", serde_json::json!(block_number_hex))
            .with_metadata("transaction_count", serde_json::json!(block.transactions.len()))
            .debug(&format!(
                "Retrieved block {} with {} transactions",
                block_number_hex,
                block.transactions.len()
            ));

        Ok(block)
    }
}

/// Parse a `0x`-prefixed hex quantity. Block numbers are signed 64-bit on the
/// wire side, so anything above `i64::MAX` is rejected.
pub fn parse_hex_quantity(hex_str: &str) -> Result<u64, ChainError> {
    let digits = hex_str
        .strip_prefix("0x")
        .ok_or_else(|| ChainError::Parse(format!("missing 0x prefix in '{}'", hex_str)))?;

    let value = i64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Parse(format!("'{}': {}", hex_str, e)))?;

    u64::try_from(value).map_err(|e| ChainError::Parse(format!("'{}': {}", hex_str, e)))
}

pub fn format_block_number(block_number: u64) -> String {
    format!("0x{:x}", block_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("0x1234").unwrap(), 0x1234u64);
        assert_eq!(parse_hex_quantity("0x0").unwrap(), 0u64);
        assert_eq!(parse_hex_quantity("0x1312D00").unwrap(), 20_000_000u64);
        assert!(matches!(parse_hex_quantity("0xinvalid"), Err(ChainError::Parse(_))));
        assert!(matches!(parse_hex_quantity("0x"), Err(ChainError::Parse(_))));
        assert!(matches!(parse_hex_quantity("1234"), Err(ChainError::Parse(_))));
    }

    #[test]
    fn test_parse_hex_quantity_rejects_above_i64_max() {
        assert_eq!(parse_hex_quantity("0x7fffffffffffffff").unwrap(), i64::MAX as u64);
        assert!(matches!(parse_hex_quantity("0x8000000000000000"), Err(ChainError::Parse(_))));
        assert!(matches!(parse_hex_quantity("0xffffffffffffffff"), Err(ChainError::Parse(_))));
        assert!(matches!(parse_hex_quantity("0x-1"), Err(ChainError::Parse(_))));
    }

    #[test]
    fn test_format_block_number() {
        assert_eq!(format_block_number(0), "0x0");
        assert_eq!(format_block_number(436), "0x1b4");
        assert_eq!(format_block_number(20_000_000), "0x1312d00");
    }

    #[test]
    fn test_format_and_parse_agree() {
        for n in [1u64, 95, 100, 18_000_000] {
            assert_eq!(parse_hex_quantity(&format_block_number(n)).unwrap(), n);
        }
    }

    #[test]
    fn test_chain_error_display() {
        let error = ChainError::BlockNotFound("0x64".to_string());
        assert_eq!(error.to_string(), "block 0x64 not found");
    }
}
