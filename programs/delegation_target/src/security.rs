use anchor_lang::prelude::*;

/// Maximum batch entries per delegated call. Each distinct choice costs two
/// remaining accounts plus an `open_position` instruction, and four no
/// longer fit a legacy transaction.
pub const MAX_BATCH_CHOICES: usize = 3;

/// Maximum remaining accounts forwarded to the ledger
pub const MAX_REMAINING_ACCOUNTS: usize = MAX_BATCH_CHOICES * 2;

pub mod validation {
    use super::*;
    use crate::error::DelegationError;

    pub fn validate_batch(choice_ids: &[[u8; 32]], amounts: &[u64]) -> Result<()> {
        require!(
            !choice_ids.is_empty() && choice_ids.len() == amounts.len(),
            DelegationError::InvalidBatch
        );
        require!(
            choice_ids.len() <= MAX_BATCH_CHOICES,
            DelegationError::BatchTooLarge
        );
        Ok(())
    }

    pub fn validate_remaining_accounts(accounts: &[AccountInfo]) -> Result<()> {
        require!(
            accounts.len() <= MAX_REMAINING_ACCOUNTS,
            DelegationError::BatchTooLarge
        );
        Ok(())
    }

    /// Checked sum of the batch amounts
    pub fn batch_total(amounts: &[u64]) -> Result<u64> {
        amounts.iter().try_fold(0u64, |acc, amount| {
            acc.checked_add(*amount)
                .ok_or_else(|| error!(DelegationError::AmountOverflow))
        })
    }
}
