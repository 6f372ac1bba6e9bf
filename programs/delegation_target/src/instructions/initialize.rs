use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use choice_ledger::state::LedgerSession;

use crate::{
    error::DelegationError,
    events::TargetInitialized,
    instructions::{Args as _, InitializeArgs},
    state::TargetConfig,
};

pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
    args.validate()?;

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.value_asset = ctx.accounts.value_asset.key();
    config.ledger = ctx.accounts.ledger_session.key();
    config.relayer = args.relayer;
    config.ceiling = args.ceiling;
    config.network_id = args.network_id;
    config.require_commitment = args.require_commitment;
    config.bump = ctx.bumps.config;

    emit!(TargetInitialized {
        authority: config.authority,
        value_asset: config.value_asset,
        ledger: config.ledger,
        relayer: config.relayer,
        ceiling: config.ceiling,
        network_id: config.network_id,
        require_commitment: config.require_commitment,
    });
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + TargetConfig::INIT_SPACE,
        seeds = [TargetConfig::PREFIX_SEED],
        bump
    )]
    pub config: Box<Account<'info, TargetConfig>>,

    pub value_asset: Box<Account<'info, Mint>>,

    #[account(
        constraint = ledger_session.initialized @ DelegationError::InvalidLedger,
        constraint = ledger_session.value_asset == value_asset.key()
            @ DelegationError::InvalidValueAsset,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    pub system_program: Program<'info, System>,
}
