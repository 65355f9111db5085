use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eth_tx_scanner::api::{CliHandler, Commands};
use eth_tx_scanner::blockchain::RpcClient;
use eth_tx_scanner::models::{ScanRange, ScanSummary};

const TARGET: &str = "0x00000000000000000000000000000000000000aa";

async fn setup_node(head: &str) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_blockNumber"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": head})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_getBlockByNumber"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "number": "0x1",
                "transactions": [{"hash": "0x01", "from": TARGET, "to": null, "value": "0x0"}]
            }
        })))
        .mount(&mock_server)
        .await;

    mock_server
}

#[tokio::test]
async fn test_cli_scan_clamps_to_head() {
    let node = setup_node("0x3").await;
    let handler = CliHandler::new(Arc::new(RpcClient::new(node.uri()).unwrap()), Duration::ZERO);

    let summary = handler
        .scan(TARGET, ScanRange::new(1, 50), Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary, ScanSummary { blocks_scanned: 3, blocks_skipped: 0, matches: 3 });
}

#[tokio::test]
async fn test_cli_commands_succeed_against_node() {
    let node = setup_node("0x2").await;
    let handler = CliHandler::new(Arc::new(RpcClient::new(node.uri()).unwrap()), Duration::ZERO);

    tokio_test::assert_ok!(handler.execute_command(&Commands::LatestBlock).await);
    tokio_test::assert_ok!(
        handler
            .execute_command(&Commands::Scan {
                address: TARGET.to_string(),
                start_block: 1,
                end_block: 2,
                delay_ms: Some(0),
            })
            .await
    );
    tokio_test::assert_ok!(handler.execute_command(&Commands::SampleConfig).await);
}

#[tokio::test]
async fn test_cli_fails_when_head_unavailable() {
    let handler = CliHandler::new(
        Arc::new(RpcClient::new_with_timeout("http://127.0.0.1:1".to_string(), 2).unwrap()),
        Duration::ZERO,
    );

    let result = handler.execute_command(&Commands::LatestBlock).await;
    assert!(result.is_err());
}
