use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::ChoiceId;

declare_id!("A6f8xh6guT4erShSjXx7YXSw3DJjMUECPuwJxdbBcnKG");

/// Multi-choice staking ledger. Every `LedgerSession` account is an isolated
/// instance of this program's logic bound to one SPL mint.
#[program]
pub mod choice_ledger {
    use super::*;

    /// Bind a fresh session account to its value asset and label
    pub fn initialize(ctx: Context<Initialize>, label: String) -> Result<()> {
        instructions::initialize(ctx, label)
    }

    /// Same as `initialize`, but the session lives at a PDA derived from
    /// the creator and a caller-chosen salt
    pub fn initialize_deterministic(
        ctx: Context<InitializeDeterministic>,
        salt: [u8; 32],
        label: String,
    ) -> Result<()> {
        instructions::initialize_deterministic(ctx, salt, label)
    }

    /// Derive a choice id from (creator, salt) and attach its metadata once
    pub fn register_choice(
        ctx: Context<RegisterChoice>,
        salt: [u8; 32],
        name: String,
        symbol: String,
        uri: String,
    ) -> Result<()> {
        instructions::register_choice(ctx, salt, name, symbol, uri)
    }

    /// Idempotently create the choice record and a holder's position
    pub fn open_position(ctx: Context<OpenPosition>, choice_id: ChoiceId) -> Result<()> {
        instructions::open_position(ctx, choice_id)
    }

    /// Pull the batch total from the staker and credit every choice
    pub fn add_stakes<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, StakeBatch<'info>>,
        choice_ids: Vec<ChoiceId>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        instructions::add_stakes(ctx, choice_ids, amounts)
    }

    /// Debit every choice and return the batch total to the staker
    pub fn remove_stakes<'c: 'info, 'info>(
        ctx: Context<'_, '_, 'c, 'info, StakeBatch<'info>>,
        choice_ids: Vec<ChoiceId>,
        amounts: Vec<u64>,
    ) -> Result<()> {
        instructions::remove_stakes(ctx, choice_ids, amounts)
    }

    /// Move a receipt balance to another holder
    pub fn transfer_stake(
        ctx: Context<TransferStake>,
        choice_id: ChoiceId,
        amount: u64,
    ) -> Result<()> {
        instructions::transfer_stake(ctx, choice_id, amount)
    }
}
