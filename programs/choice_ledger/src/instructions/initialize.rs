use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::{events::SessionInitialized, state::LedgerSession};

pub fn initialize(ctx: Context<Initialize>, label: String) -> Result<()> {
    let session_key = ctx.accounts.ledger_session.key();
    ctx.accounts.ledger_session.bind(
        ctx.accounts.value_asset.key(),
        label,
        ctx.accounts.creator.key(),
        ctx.accounts.vault.key(),
        ctx.bumps.session_authority,
    )?;

    emit_initialized(session_key, &ctx.accounts.ledger_session);
    Ok(())
}

pub fn initialize_deterministic(
    ctx: Context<InitializeDeterministic>,
    _salt: [u8; 32],
    label: String,
) -> Result<()> {
    let session_key = ctx.accounts.ledger_session.key();
    ctx.accounts.ledger_session.bind(
        ctx.accounts.value_asset.key(),
        label,
        ctx.accounts.creator.key(),
        ctx.accounts.vault.key(),
        ctx.bumps.session_authority,
    )?;

    emit_initialized(session_key, &ctx.accounts.ledger_session);
    Ok(())
}

fn emit_initialized(session: Pubkey, ledger_session: &LedgerSession) {
    msg!("Ledger session initialized: {}", session);
    emit!(SessionInitialized {
        session,
        value_asset: ledger_session.value_asset,
        creator: ledger_session.creator,
        label: ledger_session.label.clone(),
    });
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Recorded as the session creator
    pub creator: Signer<'info>,

    /// Fresh instance account; a second initialize finds it bound and fails
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + LedgerSession::INIT_SPACE,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    pub value_asset: Box<Account<'info, Mint>>,

    #[account(
        seeds = [LedgerSession::AUTHORITY_SEED, ledger_session.key().as_ref()],
        bump
    )]
    /// CHECK: PDA used only as vault owner and transfer delegate
    pub session_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        seeds = [LedgerSession::VAULT_SEED, ledger_session.key().as_ref()],
        bump,
        token::mint = value_asset,
        token::authority = session_authority,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(salt: [u8; 32])]
pub struct InitializeDeterministic<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub creator: Signer<'info>,

    /// Instance PDA derived from (creator, salt)
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + LedgerSession::INIT_SPACE,
        seeds = [LedgerSession::PREFIX_SEED, creator.key().as_ref(), salt.as_ref()],
        bump
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    pub value_asset: Box<Account<'info, Mint>>,

    #[account(
        seeds = [LedgerSession::AUTHORITY_SEED, ledger_session.key().as_ref()],
        bump
    )]
    /// CHECK: PDA used only as vault owner and transfer delegate
    pub session_authority: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        seeds = [LedgerSession::VAULT_SEED, ledger_session.key().as_ref()],
        bump,
        token::mint = value_asset,
        token::authority = session_authority,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}
