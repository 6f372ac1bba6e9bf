use anchor_lang::prelude::*;

use crate::{authorization::DelegationAuthorization, error::DelegationError, security::validation};

pub trait Args {
    fn validate(&self) -> Result<()>;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitializeArgs {
    pub relayer: Pubkey,
    pub ceiling: u64,
    pub network_id: u64,
    pub require_commitment: bool,
}

impl Args for InitializeArgs {
    fn validate(&self) -> Result<()> {
        require!(self.ceiling > 0, DelegationError::InvalidCeiling);
        require_keys_neq!(self.relayer, Pubkey::default(), DelegationError::OnlyRelayer);
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct DelegatedCallArgs {
    /// 20-byte address of the holder; selects the delegated wallet
    pub holder: [u8; 20],
    pub authorization: DelegationAuthorization,
    pub choice_ids: Vec<[u8; 32]>,
    pub amounts: Vec<u64>,
}

impl Args for DelegatedCallArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_batch(&self.choice_ids, &self.amounts)?;
        self.authorization.check_structure()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct WithdrawArgs {
    pub holder: [u8; 20],
    pub authorization: DelegationAuthorization,
    pub amount: u64,
}

impl Args for WithdrawArgs {
    fn validate(&self) -> Result<()> {
        require!(self.amount > 0, DelegationError::InvalidAmount);
        self.authorization.check_structure()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct DelegatedTransferArgs {
    pub holder: [u8; 20],
    pub authorization: DelegationAuthorization,
    pub choice_id: [u8; 32],
    pub amount: u64,
}

impl Args for DelegatedTransferArgs {
    fn validate(&self) -> Result<()> {
        require!(self.amount > 0, DelegationError::InvalidAmount);
        self.authorization.check_structure()
    }
}
