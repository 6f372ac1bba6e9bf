//! JSON shapes of the relay HTTP surface.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthorization {
    /// Delegation target the holder signed for
    pub address: String,
    pub chain_id: u64,
    /// Decimal sequence number
    pub nonce: String,
    pub r: String,
    pub s: String,
    pub y_parity: u8,
    /// Optional hex intent commitment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub authorization: WireAuthorization,
    pub choice_ids: Vec<String>,
    pub amounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDetails {
    pub relayer: String,
    pub chain_id: u64,
    /// 0x-prefixed address of the recovered holder
    pub eoa: String,
    pub delegated_to: String,
    /// Delegated wallet account standing in for the holder
    pub wallet: String,
    pub choice_ids: Vec<String>,
    pub amounts: Vec<String>,
    pub total_amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub details: Value,
}

impl SubmitResponse {
    pub fn accepted(tx_hash: String, details: &SubmitDetails) -> Self {
        Self {
            success: true,
            tx_hash: Some(tx_hash),
            error: None,
            details: serde_json::to_value(details).unwrap_or(Value::Null),
        }
    }

    pub fn rejected(kind: &str, details: Value) -> Self {
        Self {
            success: false,
            tx_hash: None,
            error: Some(kind.to_string()),
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub relayer: String,
    pub chain_id: u64,
    pub target: String,
}
