pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub use blockchain::{BlockScanner, ChainReader, RpcClient};
pub use config::{ApiConfig, AppConfig, LoggingConfig, RpcConfig, ScannerConfig};
pub use error::ScannerError;
pub use logging::{ErrorLogger, LogContext, MetricsLogger, PerformanceMonitor};
