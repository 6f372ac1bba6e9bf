use anchor_lang::prelude::*;

declare_id!("FWJgPAgULWrrgoURrA3qqF4JM3u1xezKbvkzEtcrPpem");

pub mod error;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

#[program]
pub mod ledger_factory {
    use super::*;

    /// Bind the factory to the ledger template program
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        instructions::initialize(ctx)
    }

    /// Initialize a fresh keypair-addressed ledger session
    pub fn deploy(ctx: Context<Deploy>, label: String) -> Result<Pubkey> {
        instructions::deploy(ctx, label)
    }

    /// Initialize a ledger session at the address predicted for `salt`
    pub fn deploy_deterministic(
        ctx: Context<DeployDeterministic>,
        label: String,
        salt: [u8; 32],
    ) -> Result<Pubkey> {
        instructions::deploy_deterministic(ctx, label, salt)
    }

    pub fn predict_address(ctx: Context<PredictAddress>, salt: [u8; 32]) -> Result<Pubkey> {
        instructions::predict_address(ctx, salt)
    }
}
