//! JSON-RPC collaborators.
//!
//! Two endpoints are involved in scheduling: the Neon EVM proxy (program
//! parameters, nonce, chain id) and the Solana ledger (blockhash, airdrop,
//! submission). Both are reached through [`JsonRpcClient`]; the traits exist
//! so the submitter can be driven by test doubles.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use neon_evm::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection, timeout, or HTTP status failure.
    #[error("{method}: transport failure: {message}")]
    Transport { method: String, message: String },

    /// The endpoint answered with a JSON-RPC error object.
    #[error("{method}: rpc error {code}: {message}")]
    Response {
        method: String,
        code: i64,
        message: String,
    },

    /// The endpoint answered, but not with what was asked for.
    #[error("{method}: unexpected response: {message}")]
    Decode { method: String, message: String },
}

/// Program parameters reported by `neon_getEvmParams`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmParams {
    /// Base58 Neon EVM program id.
    pub neon_evm_program_id: String,
    pub neon_treasury_pool_count: u32,
}

#[async_trait]
pub trait EvmRpc: Send + Sync {
    async fn evm_params(&self) -> Result<EvmParams, RpcError>;

    /// Pending nonce of `address` at the `latest` block.
    async fn transaction_count(&self, address: &Address) -> Result<u64, RpcError>;

    async fn chain_id(&self) -> Result<u64, RpcError>;
}

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Latest blockhash, decoded from Base58.
    async fn latest_blockhash(&self) -> Result<[u8; 32], RpcError>;

    /// Returns the airdrop transaction signature.
    async fn request_airdrop(&self, address: &[u8; 32], lamports: u64)
        -> Result<String, RpcError>;

    /// Submits wire bytes and returns the transaction signature.
    async fn send_transaction(&self, wire: &[u8], skip_preflight: bool)
        -> Result<String, RpcError>;
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContextValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct BlockhashValue {
    blockhash: String,
}

/// Plain HTTP JSON-RPC 2.0 client.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport {
                method: "client".into(),
                message: e.to_string(),
            })?;
        Ok(Self { client, url })
    }

    /// Issue one call and decode its `result`. No retries.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(method, url = %self.url, "rpc call");

        let transport = |e: reqwest::Error| RpcError::Transport {
            method: method.to_owned(),
            message: e.to_string(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?;

        let parsed: JsonRpcResponse<T> = response.json().await.map_err(|e| RpcError::Decode {
            method: method.to_owned(),
            message: e.to_string(),
        })?;

        if let Some(error) = parsed.error {
            return Err(RpcError::Response {
                method: method.to_owned(),
                code: error.code,
                message: error.message,
            });
        }

        parsed.result.ok_or_else(|| RpcError::Decode {
            method: method.to_owned(),
            message: "neither result nor error".into(),
        })
    }
}

fn decode_quantity(method: &str, quantity: &str) -> Result<u64, RpcError> {
    neon_codec::parse_hex_quantity(quantity).map_err(|e| RpcError::Decode {
        method: method.to_owned(),
        message: e.to_string(),
    })
}

#[async_trait]
impl EvmRpc for JsonRpcClient {
    async fn evm_params(&self) -> Result<EvmParams, RpcError> {
        self.call("neon_getEvmParams", json!([])).await
    }

    async fn transaction_count(&self, address: &Address) -> Result<u64, RpcError> {
        const METHOD: &str = "eth_getTransactionCount";
        let count: String = self
            .call(METHOD, json!([address.to_string(), "latest"]))
            .await?;
        decode_quantity(METHOD, &count)
    }

    async fn chain_id(&self) -> Result<u64, RpcError> {
        const METHOD: &str = "eth_chainId";
        let id: String = self.call(METHOD, json!([])).await?;
        decode_quantity(METHOD, &id)
    }
}

#[async_trait]
impl LedgerRpc for JsonRpcClient {
    async fn latest_blockhash(&self) -> Result<[u8; 32], RpcError> {
        const METHOD: &str = "getLatestBlockhash";
        let response: ContextValue<BlockhashValue> = self
            .call(METHOD, json!([{ "commitment": "finalized" }]))
            .await?;
        neon_sol::parse_pubkey(&response.value.blockhash).map_err(|e| RpcError::Decode {
            method: METHOD.to_owned(),
            message: e.to_string(),
        })
    }

    async fn request_airdrop(
        &self,
        address: &[u8; 32],
        lamports: u64,
    ) -> Result<String, RpcError> {
        self.call(
            "requestAirdrop",
            json!([neon_sol::pubkey_to_string(address), lamports]),
        )
        .await
    }

    async fn send_transaction(
        &self,
        wire: &[u8],
        skip_preflight: bool,
    ) -> Result<String, RpcError> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SendConfig {
            encoding: &'static str,
            skip_preflight: bool,
        }

        self.call(
            "sendTransaction",
            json!([
                BASE64_STANDARD.encode(wire),
                SendConfig {
                    encoding: "base64",
                    skip_preflight,
                }
            ]),
        )
        .await
    }
}
