//! Mint relay HTTP gateway
//!
//! Reaches the mint contract through a relay service that owns the signing
//! wallet connection and exposes contract reads, mint dispatch and receipt
//! lookup as REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{GatewayError, Result, SubmitRejection};
use crate::gateway::ContractGateway;
use crate::types::{
    ConfirmationReceipt, ContractSnapshot, Lane, MintRequest, MintSubmissionBody,
    RawContractState, ReceiptResponse, ReceiptStatus, RelayErrorBody, TxHandle,
};

/// Gateway configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the mint relay (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Bearer token for the relay, if it requires one
    pub api_key: Option<String>,
    /// Address of the mint contract
    pub contract_address: String,
    /// Chain the contract lives on
    pub chain_id: u64,
    /// Per-request HTTP timeout
    pub request_timeout_ms: u64,
    /// Interval between receipt polls
    pub poll_interval_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            chain_id: 1,
            request_timeout_ms: 15_000,
            poll_interval_ms: 2_000,
        }
    }
}

impl GatewayConfig {
    /// Create a config for a local development chain
    pub fn local() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            chain_id: 31337,
            poll_interval_ms: 250,
            ..Self::default()
        }
    }

    /// Create a config for the Sepolia testnet
    pub fn testnet() -> Self {
        Self {
            chain_id: 11155111,
            ..Self::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// [`ContractGateway`] backed by the mint relay's REST API
pub struct HttpContractGateway {
    client: reqwest::Client,
    base_url: String,
    config: GatewayConfig,
}

impl HttpContractGateway {
    /// Create a new gateway without panicking.
    pub fn try_new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &config.api_key {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| GatewayError::InvalidHeader(e.to_string()))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn contract_url(&self, path: &str) -> String {
        format!(
            "{}/api/v1/contracts/{}/{}",
            self.base_url, self.config.contract_address, path
        )
    }

    fn receipt_url(&self, tx: &TxHandle) -> String {
        format!(
            "{}/api/v1/transactions/{}/receipt",
            self.base_url, tx.tx_hash
        )
    }
}

/// Map a relay error body onto the submit rejection it describes
fn rejection_from_body(status: StatusCode, body: &str) -> SubmitRejection {
    match serde_json::from_str::<RelayErrorBody>(body) {
        Ok(err) => match err.code.as_str() {
            "user_rejected" => SubmitRejection::UserRejected,
            "insufficient_funds" => SubmitRejection::InsufficientFunds,
            "execution_reverted" => SubmitRejection::ExecutionReverted(err.message),
            other => SubmitRejection::Other(format!("{other}: {}", err.message)),
        },
        Err(_) => SubmitRejection::Other(format!("relay returned {}: {}", status.as_u16(), body)),
    }
}

/// Decode a success body; a body that arrives but does not parse is `Json`,
/// a body that never arrives is `Request`.
async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ContractGateway for HttpContractGateway {
    async fn read_state(&self) -> Result<ContractSnapshot> {
        let url = self.contract_url("state");
        debug!(%url, "reading contract state");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GatewayError::ReadState(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let raw: RawContractState = response
                .json()
                .await
                .map_err(|e| GatewayError::ReadState(format!("invalid body: {e}")))?;
            ContractSnapshot::try_from(raw)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::Unauthorized(body))
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "contract state read failed");
            Err(GatewayError::ReadState(format!(
                "relay returned {}: {}",
                status.as_u16(),
                body
            )))
        }
    }

    async fn submit_mint(&self, request: &MintRequest) -> Result<TxHandle> {
        let path = match request.lane {
            Lane::Whitelist => "whitelist-mint",
            Lane::Public => "public-mint",
        };
        let url = self.contract_url(path);
        let body = MintSubmissionBody::from(request);
        debug!(
            attempt = %request.attempt_id,
            %url,
            quantity = request.quantity,
            value = %request.cost,
            "submitting mint"
        );

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if status.is_success() {
            decode_body(response).await
        } else if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::Unauthorized(body))
        } else if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let rejection = rejection_from_body(status, &body);
            warn!(attempt = %request.attempt_id, %rejection, "mint rejected");
            Err(GatewayError::Submit(rejection))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(GatewayError::ApiError {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn await_confirmation(&self, tx: &TxHandle) -> Result<ConfirmationReceipt> {
        let url = self.receipt_url(tx);
        loop {
            let response = self.client.get(&url).send().await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                debug!(tx = %tx.tx_hash, "receipt pending");
                tokio::time::sleep(self.config.poll_interval()).await;
                continue;
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::ApiError {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let receipt: ReceiptResponse = decode_body(response).await?;
            return match receipt.status {
                ReceiptStatus::Success => Ok(ConfirmationReceipt {
                    tx_hash: receipt.tx_hash,
                    block_number: receipt.block_number,
                    gas_used: receipt.gas_used,
                }),
                ReceiptStatus::Reverted => Err(GatewayError::Reverted {
                    tx: receipt.tx_hash,
                    reason: receipt
                        .revert_reason
                        .unwrap_or_else(|| "no reason given".to_string()),
                }),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_allowlist::MembershipProof;
    use mintgate_primitives::{Address, Hash256, Wei};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::mpsc;

    #[test]
    fn test_gateway_config_default() {
        let config = GatewayConfig::default();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_gateway_config_local() {
        let config = GatewayConfig::local();
        assert_eq!(config.chain_id, 31337);
        assert!(config.base_url.contains("localhost"));
    }

    #[test]
    fn test_gateway_config_partial_uses_defaults() {
        let config: GatewayConfig = serde_json::from_value(serde_json::json!({
            "base_url": "https://relay.example",
            "chain_id": 10
        }))
        .unwrap();
        assert_eq!(config.chain_id, 10);
        assert_eq!(config.request_timeout_ms, 15_000);
    }

    #[test]
    fn test_gateway_creation() {
        let mut config = GatewayConfig::local();
        config.api_key = Some("test_key".to_string());
        let gateway = HttpContractGateway::try_new(config).unwrap();
        assert_eq!(gateway.config().chain_id, 31337);
    }

    #[test]
    fn test_invalid_api_key_header() {
        let mut config = GatewayConfig::local();
        config.api_key = Some("bad\nkey".to_string());
        assert!(matches!(
            HttpContractGateway::try_new(config),
            Err(GatewayError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_urls() {
        let mut config = GatewayConfig::local();
        config.base_url = "http://relay:9000/".to_string();
        let gateway = HttpContractGateway::try_new(config).unwrap();
        assert_eq!(
            gateway.contract_url("state"),
            "http://relay:9000/api/v1/contracts/0x5FbDB2315678afecb367f032d93F642f64180aa3/state"
        );
        let tx = TxHandle::new(Hash256::from_bytes([0xab; 32]));
        assert!(gateway
            .receipt_url(&tx)
            .ends_with(&format!("/transactions/0x{}/receipt", "ab".repeat(32))));
    }

    #[test]
    fn test_rejection_mapping() {
        assert_eq!(
            rejection_from_body(
                StatusCode::BAD_REQUEST,
                r#"{"code":"user_rejected","message":"denied"}"#
            ),
            SubmitRejection::UserRejected
        );
        assert_eq!(
            rejection_from_body(
                StatusCode::PAYMENT_REQUIRED,
                r#"{"code":"insufficient_funds"}"#
            ),
            SubmitRejection::InsufficientFunds
        );
        assert_eq!(
            rejection_from_body(
                StatusCode::BAD_REQUEST,
                r#"{"code":"execution_reverted","message":"Max supply reached"}"#
            ),
            SubmitRejection::ExecutionReverted("Max supply reached".to_string())
        );
        assert!(matches!(
            rejection_from_body(StatusCode::BAD_REQUEST, "plain text"),
            SubmitRejection::Other(_)
        ));
    }

    // =========================================================================
    // Relay stub
    // =========================================================================

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    /// Serve `responses` in order, one per connection, forwarding each raw request
    async fn stub_relay(responses: Vec<(u16, String)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                let _ = tx.send(request);
                let reply = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), rx)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let content_length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn gateway_for(base_url: String) -> HttpContractGateway {
        HttpContractGateway::try_new(GatewayConfig {
            base_url,
            contract_address: CONTRACT.to_string(),
            request_timeout_ms: 5_000,
            poll_interval_ms: 10,
            ..GatewayConfig::default()
        })
        .unwrap()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut requests = Vec::new();
        while let Ok(request) = rx.try_recv() {
            requests.push(request);
        }
        requests
    }

    fn tx_hash() -> Hash256 {
        Hash256::keccak256(b"relay tx")
    }

    fn minter() -> Address {
        Address::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap()
    }

    fn receipt_json(status: &str, revert_reason: Option<&str>) -> String {
        let reason = revert_reason
            .map(|r| format!(r#","revertReason":"{r}""#))
            .unwrap_or_default();
        format!(
            r#"{{"txHash":"{}","blockNumber":7,"status":"{status}","gasUsed":21000{reason}}}"#,
            tx_hash().to_prefixed_hex()
        )
    }

    fn tx_json() -> String {
        format!(r#"{{"txHash":"{}"}}"#, tx_hash().to_prefixed_hex())
    }

    // =========================================================================
    // Relay behaviour
    // =========================================================================

    #[tokio::test]
    async fn test_receipt_polls_until_found() {
        let (url, mut rx) = stub_relay(vec![
            (404, String::new()),
            (404, String::new()),
            (200, receipt_json("success", None)),
        ])
        .await;
        let gateway = gateway_for(url);

        let receipt = gateway
            .await_confirmation(&TxHandle::new(tx_hash()))
            .await
            .unwrap();
        assert_eq!(receipt.tx_hash, tx_hash());
        assert_eq!(receipt.block_number, 7);
        assert_eq!(receipt.gas_used, Some(21_000));

        let requests = drain(&mut rx);
        assert_eq!(requests.len(), 3);
        let expected = format!("GET /api/v1/transactions/{}/receipt ", tx_hash());
        assert!(requests.iter().all(|r| r.starts_with(&expected)));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_reverted_error() {
        let (url, _rx) = stub_relay(vec![(200, receipt_json("reverted", Some("Sold out")))]).await;
        let gateway = gateway_for(url);

        match gateway.await_confirmation(&TxHandle::new(tx_hash())).await {
            Err(GatewayError::Reverted { tx, reason }) => {
                assert_eq!(tx, tx_hash());
                assert_eq!(reason, "Sold out");
            }
            other => panic!("expected Reverted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_receipt_is_json_error() {
        let (url, _rx) = stub_relay(vec![(200, "not json".to_string())]).await;
        let gateway = gateway_for(url);

        let result = gateway.await_confirmation(&TxHandle::new(tx_hash())).await;
        assert!(matches!(result, Err(GatewayError::Json(_))));
    }

    #[tokio::test]
    async fn test_state_read_parses_snapshot() {
        let body = r#"{"currentSupply":10,"totalSupply":"5000","whitelistPrice":"800000000000000000","publicPrice":"1000000000000000000","baseURI":"ipfs://drop/","maxMintPerWallet":5}"#;
        let (url, mut rx) = stub_relay(vec![(200, body.to_string())]).await;
        let gateway = gateway_for(url);

        let snapshot = gateway.read_state().await.unwrap();
        assert_eq!(snapshot.current_supply, 10);
        assert_eq!(snapshot.whitelist_price, Wei::parse_ether("0.8").unwrap());
        assert_eq!(snapshot.max_mint_per_wallet, 5);

        let requests = drain(&mut rx);
        assert!(requests[0].starts_with(&format!("GET /api/v1/contracts/{CONTRACT}/state ")));
    }

    #[tokio::test]
    async fn test_state_read_error_statuses() {
        let (url, _rx) = stub_relay(vec![
            (500, "node down".to_string()),
            (401, "missing key".to_string()),
        ])
        .await;
        let gateway = gateway_for(url);

        match gateway.read_state().await {
            Err(GatewayError::ReadState(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("node down"));
            }
            other => panic!("expected ReadState, got {:?}", other),
        }
        assert!(matches!(
            gateway.read_state().await,
            Err(GatewayError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_routes_by_lane() {
        let (url, mut rx) = stub_relay(vec![(200, tx_json()), (200, tx_json())]).await;
        let gateway = gateway_for(url);
        let proof = MembershipProof::new(vec![Hash256::keccak256(b"sibling")]);

        let whitelist = MintRequest::whitelist(minter(), 2, Wei::parse_ether("1.6").unwrap(), proof);
        let handle = gateway.submit_mint(&whitelist).await.unwrap();
        assert_eq!(handle.tx_hash, tx_hash());

        let public = MintRequest::public(minter(), 1, Wei::parse_ether("1").unwrap());
        gateway.submit_mint(&public).await.unwrap();

        let requests = drain(&mut rx);
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with(&format!(
            "POST /api/v1/contracts/{CONTRACT}/whitelist-mint "
        )));
        assert!(requests[0].contains(r#""value":"1600000000000000000""#));
        assert!(requests[0].contains(r#""proof":["#));
        assert!(requests[1].starts_with(&format!(
            "POST /api/v1/contracts/{CONTRACT}/public-mint "
        )));
        assert!(!requests[1].contains(r#""proof""#));
    }

    #[tokio::test]
    async fn test_submit_rejections_mapped() {
        let (url, _rx) = stub_relay(vec![
            (
                400,
                r#"{"code":"insufficient_funds","message":"balance too low"}"#.to_string(),
            ),
            (
                422,
                r#"{"code":"execution_reverted","message":"Exceeds max mint"}"#.to_string(),
            ),
        ])
        .await;
        let gateway = gateway_for(url);
        let request = MintRequest::public(minter(), 1, Wei::parse_ether("1").unwrap());

        assert!(matches!(
            gateway.submit_mint(&request).await,
            Err(GatewayError::Submit(SubmitRejection::InsufficientFunds))
        ));
        match gateway.submit_mint(&request).await {
            Err(GatewayError::Submit(SubmitRejection::ExecutionReverted(reason))) => {
                assert_eq!(reason, "Exceeds max mint")
            }
            other => panic!("expected ExecutionReverted, got {:?}", other),
        }
    }
}
