use anchor_lang::prelude::*;

use crate::{error::DelegationError, security::validation};

/// Immutable deployment parameters of the delegation target
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct TargetConfig {
    pub authority: Pubkey,
    /// SPL mint the bound ledger session accepts
    pub value_asset: Pubkey,
    /// Ledger session every delegated call is routed to
    pub ledger: Pubkey,
    /// Only identity allowed to drive delegated calls
    pub relayer: Pubkey,
    /// Maximum batch total of one `add_stakes` call
    pub ceiling: u64,
    pub network_id: u64,
    /// Reject delegations that do not commit to the exact batch
    pub require_commitment: bool,
    pub bump: u8,
}

impl TargetConfig {
    pub const PREFIX_SEED: &'static [u8] = b"target_config";

    /// Batch total, rejected when it exceeds the ceiling.
    pub fn check_ceiling(&self, amounts: &[u64]) -> Result<u64> {
        let total = validation::batch_total(amounts)?;
        require!(total <= self.ceiling, DelegationError::AmountTooHigh);
        Ok(total)
    }
}
