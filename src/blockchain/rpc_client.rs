use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};

pub const JSON_CONTENT_TYPE: &str = "application/json";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("RPC node error: code={code}, message={message}")]
    Node { code: i64, message: String },
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    // Calls are sequential per scan, so a constant id is enough.
    fn new(method: &'a str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

/// JSON-RPC 2.0 client bound to a single node endpoint
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
}

impl RpcClient {
    pub fn new(endpoint: String) -> Result<Self, RpcError> {
        Self::new_with_timeout(endpoint, DEFAULT_TIMEOUT_SECONDS)
    }

    /// Build a client with a bounded per-request timeout
    pub fn new_with_timeout(endpoint: String, timeout_seconds: u64) -> Result<Self, RpcError> {
        let context = LogContext::new("rpc_client", "initialization")
            .with_metadata("endpoint", serde_json::json!(endpoint))
            .with_metadata("timeout_seconds", serde_json::json!(timeout_seconds));
        context.info("Initializing RPC client");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one JSON-RPC call and return its `result` member.
    ///
    /// The node must answer with a content type of exactly `application/json`;
    /// any other answer is reported with its raw body for diagnostics.
    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let monitor = PerformanceMonitor::new("rpc_call")
            .with_metadata("method", serde_json::json!(method));

        let result = self.send(method, params).await;

        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(method, duration, result.is_ok());

        result
    }

    async fn send(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let request = JsonRpcRequest::new(method, params);

        LogContext::new("rpc_client", "call")
            .with_metadata("method", serde_json::json!(method))
            .trace(&format!("Sending RPC request: {}", method));

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(&request)
            .send()
            .await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await?;

        if content_type != JSON_CONTENT_TYPE {
            return Err(RpcError::Protocol(format!(
                "received non-JSON response: {}",
                body
            )));
        }

        let envelope: Map<String, Value> = serde_json::from_str(&body).map_err(|e| {
            RpcError::Protocol(format!("failed to decode JSON response: {}", e))
        })?;

        extract_result(envelope)
    }
}

fn extract_result(mut envelope: Map<String, Value>) -> Result<Value, RpcError> {
    if let Some(result) = envelope.remove("result") {
        return Ok(result);
    }

    match envelope.remove("error") {
        Some(Value::Object(error)) => Err(RpcError::Node {
            code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        }),
        Some(other) => Err(RpcError::Protocol(format!("malformed error member: {}", other))),
        None => Err(RpcError::Protocol("No result in response".to_string())),
    }
}
