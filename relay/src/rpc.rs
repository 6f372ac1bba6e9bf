use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::{hash::Hash, instruction::Instruction, message::Message};
use async_trait::async_trait;
use base64::Engine as _;
use ed25519_dalek::{Signer as _, SigningKey};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::config::relayer_pubkey;
use crate::error::RelayError;
use crate::settlement::Settlement;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcFailure>,
}

#[derive(Debug, Deserialize)]
struct RpcFailure {
    code: i64,
    message: String,
}

/// JSON-RPC settlement. Transactions are legacy messages signed by the
/// relayer alone.
pub struct RpcSettlement {
    client: reqwest::Client,
    url: String,
    signing_key: SigningKey,
    relayer: Pubkey,
    // Held from blockhash fetch until the send returns so the relayer never
    // races itself.
    lane: Mutex<()>,
}

impl RpcSettlement {
    pub fn new(url: impl Into<String>, signing_key: SigningKey) -> Self {
        let relayer = relayer_pubkey(&signing_key);
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            signing_key,
            relayer,
            lane: Mutex::new(()),
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RelayError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RelayError::ExecutionFailure(format!("{method}: {err}")))?
            .json()
            .await
            .map_err(|err| RelayError::ExecutionFailure(format!("{method}: {err}")))?;

        if let Some(failure) = response.error {
            return Err(RelayError::ExecutionFailure(format!(
                "{method} rejected ({}): {}",
                failure.code, failure.message
            )));
        }
        response
            .result
            .ok_or_else(|| RelayError::ExecutionFailure(format!("{method}: empty result")))
    }

    async fn latest_blockhash(&self) -> Result<Hash, RelayError> {
        let result = self
            .call("getLatestBlockhash", json!([{ "commitment": "confirmed" }]))
            .await?;
        let raw = result
            .pointer("/value/blockhash")
            .and_then(Value::as_str)
            .ok_or_else(|| RelayError::ExecutionFailure("blockhash missing".to_string()))?;
        Hash::from_str(raw).map_err(|err| RelayError::ExecutionFailure(err.to_string()))
    }
}

/// Wire form of a single-signer legacy transaction.
pub fn encode_transaction(message: &Message, signing_key: &SigningKey) -> Vec<u8> {
    let message_bytes = message.serialize();
    let signature = signing_key.sign(&message_bytes);

    let mut wire = Vec::with_capacity(1 + 64 + message_bytes.len());
    // compact-u16 signature count
    wire.push(1);
    wire.extend_from_slice(&signature.to_bytes());
    wire.extend_from_slice(&message_bytes);
    wire
}

#[async_trait]
impl Settlement for RpcSettlement {
    fn relayer(&self) -> Pubkey {
        self.relayer
    }

    async fn submit(&self, instructions: Vec<Instruction>) -> Result<String, RelayError> {
        let _lane = self.lane.lock().await;

        let blockhash = self.latest_blockhash().await?;
        let message = Message::new_with_blockhash(&instructions, Some(&self.relayer), &blockhash);
        let wire = encode_transaction(&message, &self.signing_key);
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire);

        let result = self
            .call(
                "sendTransaction",
                json!([encoded, { "encoding": "base64", "preflightCommitment": "confirmed" }]),
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RelayError::ExecutionFailure("signature missing".to_string()))
    }
}
