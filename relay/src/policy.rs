//! Fail-fast validation of a submission against relay policy.
//!
//! Economic content (choices, amounts, ceiling) is checked before the
//! signature is recovered; nothing here costs anything on-chain.

use std::str::FromStr;

use alloy_primitives::U256;
use anchor_lang::prelude::Pubkey;
use delegation_target::authorization::{wallet_address, DelegationAuthorization, Intent};
use delegation_target::security::MAX_BATCH_CHOICES;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::wire::{SubmitDetails, SubmitRequest};

/// A submission that passed every relay-side check.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub authorization: DelegationAuthorization,
    /// Recovered holder address
    pub holder: [u8; 20],
    pub wallet: Pubkey,
    pub choice_ids: Vec<[u8; 32]>,
    pub amounts: Vec<u64>,
    pub total: u64,
}

impl ValidatedSubmission {
    pub fn details(&self, relayer: &Pubkey, network_id: u64) -> SubmitDetails {
        SubmitDetails {
            relayer: relayer.to_string(),
            chain_id: network_id,
            eoa: format!("0x{}", hex::encode(self.holder)),
            delegated_to: self.authorization.target.to_string(),
            wallet: self.wallet.to_string(),
            choice_ids: self
                .choice_ids
                .iter()
                .map(|id| U256::from_be_bytes(*id).to_string())
                .collect(),
            amounts: self.amounts.iter().map(u64::to_string).collect(),
            total_amount: self.total.to_string(),
        }
    }
}

fn parse_decimal(raw: &str, field: &str) -> Result<U256, RelayError> {
    U256::from_str_radix(raw, 10)
        .map_err(|err| RelayError::MalformedRequest(format!("{field} {raw:?}: {err}")))
}

fn parse_hex32(raw: &str) -> Option<[u8; 32]> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(digits).ok()?;
    bytes.try_into().ok()
}

pub fn validate(
    config: &RelayConfig,
    request: &SubmitRequest,
) -> Result<ValidatedSubmission, RelayError> {
    let auth = &request.authorization;

    // 1. Shape
    if request.choice_ids.is_empty() || request.choice_ids.len() != request.amounts.len() {
        return Err(RelayError::MalformedRequest(format!(
            "choiceIds ({}) and amounts ({}) must be non-empty and of equal length",
            request.choice_ids.len(),
            request.amounts.len()
        )));
    }
    if request.choice_ids.len() > MAX_BATCH_CHOICES {
        return Err(RelayError::MalformedRequest(format!(
            "batch of {} entries exceeds the limit of {MAX_BATCH_CHOICES} per transaction",
            request.choice_ids.len()
        )));
    }
    let choice_ids = request
        .choice_ids
        .iter()
        .map(|raw| parse_decimal(raw, "choiceId"))
        .collect::<Result<Vec<_>, _>>()?;
    let amounts = request
        .amounts
        .iter()
        .map(|raw| parse_decimal(raw, "amount"))
        .collect::<Result<Vec<_>, _>>()?;
    let nonce = u64::from_str(&auth.nonce)
        .map_err(|err| RelayError::MalformedRequest(format!("nonce {:?}: {err}", auth.nonce)))?;
    let commitment = match &auth.commitment {
        Some(raw) => Some(parse_hex32(raw).ok_or_else(|| {
            RelayError::MalformedRequest(format!("commitment {raw:?} is not 32 hex bytes"))
        })?),
        None => None,
    };

    // 2. Network
    if auth.chain_id != config.network_id {
        return Err(RelayError::NetworkMismatch {
            expected: config.network_id,
            got: auth.chain_id,
        });
    }

    // 3. Target
    let target = Pubkey::from_str(&auth.address)
        .ok()
        .filter(|target| *target == config.target)
        .ok_or_else(|| RelayError::TargetNotAllowed(auth.address.clone()))?;

    // 4. Approved choices
    if let Some(index) = choice_ids
        .iter()
        .position(|id| !config.approved_choices.contains(id))
    {
        return Err(RelayError::ChoiceNotApproved(request.choice_ids[index].clone()));
    }

    // 5. Positive amounts
    if let Some(index) = amounts.iter().position(|amount| amount.is_zero()) {
        return Err(RelayError::InvalidAmount(index));
    }

    // 6. Ceiling
    let total = amounts
        .iter()
        .try_fold(U256::ZERO, |acc, amount| acc.checked_add(*amount));
    let ceiling = U256::from(config.ceiling);
    let total = match total {
        Some(total) if total <= ceiling => total,
        Some(total) => {
            return Err(RelayError::AmountTooHigh {
                total: total.to_string(),
                ceiling: config.ceiling,
            })
        }
        None => {
            return Err(RelayError::AmountTooHigh {
                total: "overflow".to_string(),
                ceiling: config.ceiling,
            })
        }
    };
    // Every amount is at most the total, which is at most a u64 ceiling.
    let amounts = amounts
        .iter()
        .map(|amount| u64::try_from(*amount))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| RelayError::MalformedRequest(err.to_string()))?;
    let total =
        u64::try_from(total).map_err(|err| RelayError::MalformedRequest(err.to_string()))?;

    // 7. Authorization
    let (r, s) = match (parse_hex32(&auth.r), parse_hex32(&auth.s)) {
        (Some(r), Some(s)) => (r, s),
        _ => {
            return Err(RelayError::InvalidAuthorization(
                "r and s must be 32 hex bytes".to_string(),
            ))
        }
    };
    let authorization = DelegationAuthorization {
        target,
        network_id: auth.chain_id,
        nonce,
        r,
        s,
        y_parity: auth.y_parity,
        commitment,
    };
    let holder = authorization
        .recover_signer()
        .map_err(|err| RelayError::InvalidAuthorization(err.to_string()))?;

    // 8. Intent commitment
    let choice_ids: Vec<[u8; 32]> = choice_ids.iter().map(|id| id.to_be_bytes::<32>()).collect();
    let intent = Intent::AddStakes {
        choice_ids: &choice_ids,
        amounts: &amounts,
    };
    match commitment {
        Some(commitment) if commitment != intent.commitment() => {
            return Err(RelayError::CommitmentMismatch)
        }
        None if config.require_commitment => return Err(RelayError::CommitmentRequired),
        _ => {}
    }

    Ok(ValidatedSubmission {
        authorization,
        holder,
        wallet: wallet_address(&holder).0,
        choice_ids,
        amounts,
        total,
    })
}
