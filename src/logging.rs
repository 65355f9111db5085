use log::{debug, error, info, trace, warn};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::config::LoggingConfig;
use crate::error::{ErrorSeverity, ScannerError};
use crate::models::ScanSummary;

/// Structured logging context for the scanner
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_block_number(self, block_number: u64) -> Self {
        self.with_metadata("block_number", json!(block_number))
    }

    pub fn with_transaction_hash(self, tx_hash: &str) -> Self {
        self.with_metadata("transaction_hash", json!(tx_hash))
    }

    pub fn with_address(self, address: &str) -> Self {
        self.with_metadata("address", json!(address))
    }

    pub fn with_duration_ms(self, duration_ms: u64) -> Self {
        self.with_metadata("duration_ms", json!(duration_ms))
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }

    pub fn trace(&self, message: &str) {
        trace!("{}", self.format_message("TRACE", message));
    }
}

/// Times a single operation
pub struct PerformanceMonitor {
    start_time: Instant,
    operation: String,
    metadata: HashMap<String, Value>,
}

impl PerformanceMonitor {
    pub fn new(operation: &str) -> Self {
        Self {
            start_time: Instant::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn finish_with_result<T, E>(self, result: &Result<T, E>) -> u64
    where
        E: std::fmt::Display,
    {
        let duration = self.start_time.elapsed().as_millis() as u64;

        let mut context = LogContext::new("performance", &self.operation).with_duration_ms(duration);
        for (key, value) in self.metadata {
            context = context.with_metadata(&key, value);
        }

        match result {
            Ok(_) => context.trace(&format!("Operation completed in {}ms", duration)),
            Err(e) => {
                context = context.with_metadata("error", json!(e.to_string()));
                context.debug(&format!("Operation failed after {}ms: {}", duration, e));
            }
        }

        duration
    }
}

/// Error logging utilities
pub struct ErrorLogger;

impl ErrorLogger {
    pub fn log_error(error: &ScannerError, context: Option<LogContext>) {
        let severity = error.severity();

        let log_context = context
            .unwrap_or_else(|| LogContext::new("error", "unknown"))
            .with_metadata("error_type", json!(format!("{:?}", error)))
            .with_metadata("severity", json!(format!("{:?}", severity)));

        let message = format!("Error occurred: {}", error);

        match severity {
            ErrorSeverity::High => log_context.error(&message),
            ErrorSeverity::Medium => log_context.warn(&message),
        }
    }
}

/// Scan and RPC metrics
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_rpc_call(method: &str, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "rpc_call")
            .with_metadata("method", json!(method))
            .with_duration_ms(duration_ms)
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!("RPC call {} completed in {}ms", method, duration_ms));
        } else {
            context.warn(&format!("RPC call {} failed after {}ms", method, duration_ms));
        }
    }

    pub fn log_block_scanned(block_number: u64, transaction_count: usize, match_count: u64) {
        let context = LogContext::new("metrics", "block_scanned")
            .with_block_number(block_number)
            .with_metadata("transaction_count", json!(transaction_count))
            .with_metadata("match_count", json!(match_count));

        context.debug(&format!(
            "Block {} scanned: {} transactions, {} matches",
            block_number, transaction_count, match_count
        ));
    }

    pub fn log_scan_completed(address: &str, summary: &ScanSummary, duration_ms: u64) {
        let context = LogContext::new("metrics", "scan_completed")
            .with_address(address)
            .with_metadata("blocks_scanned", json!(summary.blocks_scanned))
            .with_metadata("blocks_skipped", json!(summary.blocks_skipped))
            .with_metadata("matches", json!(summary.matches))
            .with_duration_ms(duration_ms);

        let message = format!(
            "Scan for {} finished: {} blocks scanned, {} skipped, {} matches",
            address, summary.blocks_scanned, summary.blocks_skipped, summary.matches
        );

        if summary.blocks_skipped > 0 {
            context.warn(&message);
        } else {
            context.info(&message);
        }
    }
}

/// Initialize env_logger from the logging configuration.
///
/// `RUST_LOG` still wins over the configured level when set.
pub fn init_logging(config: &LoggingConfig) {
    let pretty_json = config.format == "json";

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.level.as_str()))
        .format(move |buf, record| {
            use std::io::Write;

            if pretty_json {
                if let Ok(json_value) = serde_json::from_str::<Value>(&record.args().to_string()) {
                    return writeln!(buf, "{}", serde_json::to_string_pretty(&json_value)?);
                }
            }

            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    info!("Logging initialized at level {}", config.level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, RpcError};

    #[test]
    fn test_log_context_creation() {
        let context = LogContext::new("test_component", "test_operation");
        assert_eq!(context.component, "test_component");
        assert_eq!(context.operation, "test_operation");
        assert!(context.metadata.is_empty());
    }

    #[test]
    fn test_log_context_with_metadata() {
        let context = LogContext::new("test", "test")
            .with_block_number(12345)
            .with_transaction_hash("0xabc123")
            .with_address("0x00000000000000000000000000000000000000aa");

        assert_eq!(context.metadata.get("block_number"), Some(&json!(12345)));
        assert_eq!(context.metadata.get("transaction_hash"), Some(&json!("0xabc123")));
        assert_eq!(
            context.metadata.get("address"),
            Some(&json!("0x00000000000000000000000000000000000000aa"))
        );
    }

    #[test]
    fn test_log_context_format_message() {
        let context = LogContext::new("scanner", "scan").with_metadata("key", json!("value"));

        let message = context.format_message("INFO", "test message");

        let parsed: Value = serde_json::from_str(&message).expect("Should be valid JSON");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["component"], "scanner");
        assert_eq!(parsed["operation"], "scan");
        assert_eq!(parsed["message"], "test message");
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn test_performance_monitor_with_result() {
        let monitor = PerformanceMonitor::new("rpc_call").with_metadata("method", json!("eth_blockNumber"));
        assert_eq!(monitor.metadata.get("method"), Some(&json!("eth_blockNumber")));

        let result: Result<(), String> = Err("connection refused".to_string());
        let duration = monitor.finish_with_result(&result);
        assert!(duration < 1_000);
    }

    #[test]
    fn test_error_logging_does_not_panic() {
        ErrorLogger::log_error(
            &ScannerError::from(ChainError::BlockNotFound("0x10".to_string())),
            Some(LogContext::new("test", "error_test")),
        );
        ErrorLogger::log_error(&ScannerError::from(ChainError::Rpc(RpcError::Protocol("bad".to_string()))), None);
    }

    #[test]
    fn test_metrics_logging() {
        MetricsLogger::log_rpc_call("eth_getBlockByNumber", 250, true);
        MetricsLogger::log_rpc_call("eth_blockNumber", 30_000, false);
        MetricsLogger::log_block_scanned(12345, 150, 2);
        MetricsLogger::log_scan_completed(
            "0x00000000000000000000000000000000000000aa",
            &ScanSummary { blocks_scanned: 5, blocks_skipped: 1, matches: 3 },
            25_000,
        );
    }
}
