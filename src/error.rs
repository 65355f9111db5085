use thiserror::Error;

pub use crate::blockchain::chain_reader::ChainError;
pub use crate::blockchain::rpc_client::RpcError;
pub use crate::blockchain::units::ConversionError;

/// Errors the scanner logs and moves past
#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("Chain read error: {0}")]
    Chain(#[from] ChainError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Request validation errors
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid block number for {name}: {value}")]
    InvalidBlockNumber { name: &'static str, value: String },
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The node answered with something unusable; data for the block is lost
    High,
    /// Expected to clear up on its own, or only degrades one value
    Medium,
}

impl ScannerError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScannerError::Chain(ChainError::Rpc(RpcError::Protocol(_)))
            | ScannerError::Chain(ChainError::Format(_))
            | ScannerError::Chain(ChainError::Parse(_))
            | ScannerError::Chain(ChainError::Decode(_)) => ErrorSeverity::High,

            ScannerError::Chain(ChainError::Rpc(RpcError::Transport(_)))
            | ScannerError::Chain(ChainError::Rpc(RpcError::Node { .. }))
            | ScannerError::Chain(ChainError::BlockNotFound(_)) => ErrorSeverity::Medium,

            ScannerError::Conversion(_) => ErrorSeverity::Medium,
        }
    }
}
