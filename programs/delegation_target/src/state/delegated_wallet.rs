use anchor_lang::prelude::*;

use crate::{
    authorization::{verify_delegation, DelegationAuthorization, Intent},
    error::DelegationError,
    state::TargetConfig,
};

/// On-chain account standing in for a secp256k1 holder. Owns the holder's
/// token account and signs ledger calls; `nonce` is the holder's sequence.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct DelegatedWallet {
    /// 20-byte address of the holder key
    pub signer: [u8; 20],
    /// Next valid delegation nonce
    pub nonce: u64,
    pub bump: u8,
}

impl DelegatedWallet {
    pub const PREFIX_SEED: &'static [u8] = b"delegated_wallet";

    pub fn is_open(&self) -> bool {
        self.signer != [0u8; 20]
    }

    pub fn open(&mut self, signer: [u8; 20], bump: u8) {
        self.signer = signer;
        self.nonce = 0;
        self.bump = bump;
    }

    /// Consume `nonce`, which must equal the current sequence.
    pub fn consume_nonce(&mut self, nonce: u64) -> Result<u64> {
        require!(nonce == self.nonce, DelegationError::InvalidNonce);
        self.nonce = nonce
            .checked_add(1)
            .ok_or(DelegationError::NonceOverflow)?;
        Ok(nonce)
    }

    /// Open on first use, run every delegation check for `intent` and burn
    /// the nonce. Returns the consumed nonce.
    pub fn authorize(
        &mut self,
        holder: [u8; 20],
        bump: u8,
        authorization: &DelegationAuthorization,
        config: &TargetConfig,
        intent: &Intent,
    ) -> Result<u64> {
        if !self.is_open() {
            self.open(holder, bump);
        }
        verify_delegation(authorization, config, self, &holder, intent)?;
        self.consume_nonce(authorization.nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_delegation_error;

    #[test]
    fn nonce_is_single_use() {
        let mut wallet = DelegatedWallet::default();
        wallet.open([1u8; 20], 255);

        assert_eq!(wallet.consume_nonce(0).unwrap(), 0);
        assert_eq!(wallet.nonce, 1);
        assert_delegation_error(wallet.consume_nonce(0), DelegationError::InvalidNonce);
        assert_delegation_error(wallet.consume_nonce(2), DelegationError::InvalidNonce);
        assert_eq!(wallet.nonce, 1);
    }

    #[test]
    fn fresh_wallet_is_closed() {
        let wallet = DelegatedWallet::default();
        assert!(!wallet.is_open());
    }
}
