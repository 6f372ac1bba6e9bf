use anchor_lang::prelude::*;

pub mod authorization;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod security;
pub mod state;

use instructions::*;

declare_id!("ArH8AUsKKXdiM3hfRDADRpzjKdUk5v1AGBFBsACXzsyA");

/// Code a holder's delegated wallet runs when the relay submits a signed
/// delegation. Only the configured relayer may drive it.
#[program]
pub mod delegation_target {
    use super::*;

    /// Write the immutable target configuration
    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        instructions::initialize(ctx, args)
    }

    /// Consume a delegation and stake the batch into the bound ledger session
    pub fn add_stakes<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, DelegatedCall<'info>>,
        args: DelegatedCallArgs,
    ) -> Result<()> {
        instructions::add_stakes(ctx, args)
    }

    /// Consume a delegation and withdraw the batch from the bound ledger session
    pub fn remove_stakes<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, DelegatedCall<'info>>,
        args: DelegatedCallArgs,
    ) -> Result<()> {
        instructions::remove_stakes(ctx, args)
    }

    /// Consume a committed delegation and move value out of the wallet
    pub fn withdraw(ctx: Context<DelegatedWithdraw>, args: WithdrawArgs) -> Result<()> {
        instructions::withdraw(ctx, args)
    }

    /// Consume a committed delegation and hand a receipt balance to another holder
    pub fn transfer_stake(
        ctx: Context<DelegatedTransfer>,
        args: DelegatedTransferArgs,
    ) -> Result<()> {
        instructions::transfer_stake(ctx, args)
    }
}
