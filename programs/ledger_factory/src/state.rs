use anchor_lang::prelude::*;

use crate::error::FactoryError;

/// Singleton binding the factory to its template program
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Factory {
    pub template: Pubkey,
    pub authority: Pubkey,
    pub deployments: u64,
    pub bump: u8,
}

impl Factory {
    pub const PREFIX_SEED: &'static [u8] = b"factory";

    /// Reserve the next deployment index.
    pub fn next_index(&mut self) -> Result<u64> {
        let index = self.deployments;
        self.deployments = index
            .checked_add(1)
            .ok_or(FactoryError::CounterOverflow)?;
        Ok(index)
    }
}

/// Marker left behind by `deploy_deterministic`; its existence claims the salt.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Deployment {
    pub factory: Pubkey,
    pub instance: Pubkey,
    pub salt: [u8; 32],
    pub index: u64,
    pub bump: u8,
}

impl Deployment {
    pub const PREFIX_SEED: &'static [u8] = b"deployment";
}
