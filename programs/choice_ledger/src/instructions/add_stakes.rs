use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_lang::AccountsExit;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    errors::ChoiceLedgerError,
    events::StakesAdded,
    state::{ChoiceId, LedgerSession},
    utils::{batch_total, fold_batch, load_batch_accounts},
    ID,
};

pub fn add_stakes<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, StakeBatch<'info>>,
    choice_ids: Vec<ChoiceId>,
    amounts: Vec<u64>,
) -> Result<()> {
    // === Batch shape ===
    let batch = fold_batch(&choice_ids, &amounts)?;
    let total = batch_total(&batch)?;

    let session_key = ctx.accounts.ledger_session.key();
    let staker = ctx.accounts.staker.key();
    let mut entries =
        load_batch_accounts(ctx.remaining_accounts, &session_key, &staker, &batch)?;

    // === Allowance ===
    let source = &ctx.accounts.staker_token_account;
    require!(
        source.delegate == COption::Some(ctx.accounts.session_authority.key())
            && source.delegated_amount >= total,
        ChoiceLedgerError::InsufficientAllowance
    );

    // === Single pull for the whole batch ===
    let authority_bump = [ctx.accounts.ledger_session.authority_bump];
    let signer_seeds: &[&[&[u8]]] = &[&[
        LedgerSession::AUTHORITY_SEED,
        session_key.as_ref(),
        &authority_bump,
    ]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.staker_token_account.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.session_authority.to_account_info(),
            },
            signer_seeds,
        ),
        total,
    )?;

    // === Credit balances and supply ===
    for ((record, position), (_, amount)) in entries.iter_mut().zip(batch.iter()) {
        position.credit(*amount)?;
        record.mint(*amount)?;
        position.exit(&ID)?;
        record.exit(&ID)?;
    }

    msg!("Staked {} across {} choices", total, batch.len());
    emit!(StakesAdded {
        session: session_key,
        staker,
        choice_ids,
        amounts,
        total,
    });
    Ok(())
}

/// Accounts shared by `add_stakes` and `remove_stakes`. Remaining accounts
/// carry one `[choice_record, position]` pair per distinct choice.
#[derive(Accounts)]
pub struct StakeBatch<'info> {
    pub staker: Signer<'info>,

    #[account(
        constraint = ledger_session.initialized @ ChoiceLedgerError::NotInitialized,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    #[account(
        seeds = [LedgerSession::AUTHORITY_SEED, ledger_session.key().as_ref()],
        bump = ledger_session.authority_bump
    )]
    /// CHECK: PDA signer validated by seeds
    pub session_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = staker_token_account.owner == staker.key()
            @ ChoiceLedgerError::InvalidTokenAccount,
        constraint = staker_token_account.mint == ledger_session.value_asset
            @ ChoiceLedgerError::InvalidValueAsset,
    )]
    pub staker_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        address = ledger_session.vault @ ChoiceLedgerError::InvalidVault,
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}
