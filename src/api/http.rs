use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::blockchain::{BlockScanner, ChainError};
use crate::error::ValidationError;
use crate::logging::LogContext;
use crate::models::ScanRange;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Error fetching latest block number: {0}")]
    ChainHead(#[source] ChainError),
    #[error("Server error: {0}")]
    Server(String),
}

impl From<&ApiError> for StatusCode {
    fn from(error: &ApiError) -> Self {
        match error {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ChainHead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        let message = match &self {
            ApiError::Validation(ValidationError::MissingParameter(_)) => {
                "Please provide address, startBlock, and endBlock parameters".to_string()
            }
            ApiError::Validation(ValidationError::InvalidBlockNumber { name, .. }) => {
                format!("Invalid {} parameter", name)
            }
            other => other.to_string(),
        };
        (status, message).into_response()
    }
}

/// Raw query of `GET /fetch-transactions`. Empty values count as missing.
#[derive(Debug, Default, Deserialize)]
pub struct FetchTransactionsQuery {
    pub address: Option<String>,
    #[serde(rename = "startBlock")]
    pub start_block: Option<String>,
    #[serde(rename = "endBlock")]
    pub end_block: Option<String>,
}

/// Validated scan request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub address: String,
    pub range: ScanRange,
}

impl FetchTransactionsQuery {
    pub fn validate(self) -> Result<ScanRequest, ValidationError> {
        let address = required(self.address, "address")?;
        let start_block = required(self.start_block, "startBlock")?;
        let end_block = required(self.end_block, "endBlock")?;

        Ok(ScanRequest {
            address,
            range: ScanRange::new(
                parse_block_number(&start_block, "startBlock")?,
                parse_block_number(&end_block, "endBlock")?,
            ),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingParameter(name))
}

fn parse_block_number(value: &str, name: &'static str) -> Result<u64, ValidationError> {
    value.parse::<u64>().map_err(|_| ValidationError::InvalidBlockNumber {
        name,
        value: value.to_string(),
    })
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<BlockScanner>,
}

/// HTTP trigger server
pub struct ApiServer {
    state: AppState,
    pub host: String,
    pub port: u16,
}

impl ApiServer {
    pub fn new(state: AppState, host: String, port: u16) -> Self {
        Self { state, host, port }
    }

    /// Bind and serve until the process exits
    pub async fn start(&self) -> Result<(), ApiError> {
        let app = router(self.state.clone());

        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApiError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        log::info!("HTTP trigger listening on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| ApiError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fetch-transactions", get(fetch_transactions))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// GET /fetch-transactions - start a background scan and acknowledge the range
pub async fn fetch_transactions(
    State(state): State<AppState>,
    Query(query): Query<FetchTransactionsQuery>,
) -> Result<String, ApiError> {
    let request = query.validate()?;

    let latest_block = state
        .scanner
        .reader()
        .get_latest_block_number()
        .await
        .map_err(|e| {
            log::error!("Failed to fetch latest block number: {}", e);
            ApiError::ChainHead(e)
        })?;

    let range = request.range.clamp_to_head(latest_block);

    LogContext::new("api", "fetch_transactions")
        .with_address(&request.address)
        .with_metadata("requested_end_block", serde_json::json!(request.range.end_block))
        .with_metadata("latest_block", serde_json::json!(latest_block))
        .info(&format!(
            "Launching scan of blocks {} to {}",
            range.start_block, range.end_block
        ));

    let scanner = state.scanner.clone();
    let address = request.address.clone();
    tokio::spawn(async move {
        scanner.scan(&address, range).await;
    });

    Ok(format!(
        "Fetching transactions for address: {} from block {} to {}",
        request.address, range.start_block, range.end_block
    ))
}
