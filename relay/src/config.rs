use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_primitives::U256;
use anchor_lang::prelude::Pubkey;
use clap::Parser;
use ed25519_dalek::SigningKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot read keypair {path}: {source}")]
    KeypairIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("keypair {0} is not a 64-byte JSON array")]
    KeypairFormat(PathBuf),
}

fn invalid(field: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "choice-relay")]
#[command(about = "Relays holder-signed staking delegations, paying execution cost")]
pub struct RelayArgs {
    #[arg(long, env = "RELAY_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    #[arg(long, env = "RELAY_RPC_URL", default_value = "http://127.0.0.1:8899")]
    pub rpc_url: String,

    /// Network id every delegation must be signed for
    #[arg(long, env = "RELAY_NETWORK_ID")]
    pub network_id: u64,

    /// Path to the relayer keypair (Solana JSON format)
    #[arg(long, env = "RELAY_KEYPAIR")]
    pub keypair: PathBuf,

    /// Allow-listed delegation target program
    #[arg(long, env = "RELAY_TARGET", default_value_t = delegation_target::ID.to_string())]
    pub target: String,

    /// Ledger session bound to the delegation target
    #[arg(long, env = "RELAY_LEDGER_SESSION")]
    pub ledger_session: String,

    /// Value asset mint of the ledger session
    #[arg(long, env = "RELAY_VALUE_ASSET")]
    pub value_asset: String,

    /// Comma-separated decimal choice ids
    #[arg(long, env = "RELAY_APPROVED_CHOICES", value_delimiter = ',')]
    pub approved_choices: Vec<String>,

    /// Maximum batch total in base units
    #[arg(long, env = "RELAY_CEILING")]
    pub ceiling: u64,

    /// Reject delegations without an intent commitment
    #[arg(long, env = "RELAY_REQUIRE_COMMITMENT", default_value_t = false)]
    pub require_commitment: bool,

    #[arg(long, env = "RELAY_MAX_BODY_BYTES", default_value_t = 16_384)]
    pub max_body_bytes: usize,

    #[arg(long, env = "RELAY_LOG", default_value = "info")]
    pub log: String,
}

/// Immutable relay policy, fixed at process start.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub network_id: u64,
    pub target: Pubkey,
    pub ledger_session: Pubkey,
    pub value_asset: Pubkey,
    pub approved_choices: BTreeSet<U256>,
    pub ceiling: u64,
    pub require_commitment: bool,
    pub max_body_bytes: usize,
}

impl RelayConfig {
    pub fn from_args(args: &RelayArgs) -> Result<Self, ConfigError> {
        let approved_choices = args
            .approved_choices
            .iter()
            .map(|raw| {
                U256::from_str_radix(raw.trim(), 10).map_err(|err| invalid("approved_choices", err))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        if approved_choices.is_empty() {
            return Err(invalid("approved_choices", "at least one choice is required"));
        }
        if args.ceiling == 0 {
            return Err(invalid("ceiling", "must be greater than zero"));
        }

        Ok(Self {
            network_id: args.network_id,
            target: Pubkey::from_str(&args.target).map_err(|err| invalid("target", err))?,
            ledger_session: Pubkey::from_str(&args.ledger_session)
                .map_err(|err| invalid("ledger_session", err))?,
            value_asset: Pubkey::from_str(&args.value_asset)
                .map_err(|err| invalid("value_asset", err))?,
            approved_choices,
            ceiling: args.ceiling,
            require_commitment: args.require_commitment,
            max_body_bytes: args.max_body_bytes,
        })
    }
}

/// Load a relayer key from a Solana CLI keypair file (JSON array of 64 bytes).
pub fn load_keypair(path: &Path) -> Result<SigningKey, ConfigError> {
    let payload = std::fs::read(path).map_err(|source| ConfigError::KeypairIo {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes: Vec<u8> = serde_json::from_slice(&payload)
        .map_err(|_| ConfigError::KeypairFormat(path.to_path_buf()))?;
    let bytes: [u8; 64] = bytes
        .try_into()
        .map_err(|_| ConfigError::KeypairFormat(path.to_path_buf()))?;
    SigningKey::from_keypair_bytes(&bytes)
        .map_err(|_| ConfigError::KeypairFormat(path.to_path_buf()))
}

pub fn relayer_pubkey(key: &SigningKey) -> Pubkey {
    Pubkey::new_from_array(key.verifying_key().to_bytes())
}
