use anchor_lang::prelude::*;
use anchor_lang::AccountsExit;
use anchor_spl::token::{self, Transfer};

use crate::{
    events::StakesRemoved,
    instructions::StakeBatch,
    state::{ChoiceId, LedgerSession},
    utils::{batch_total, fold_batch, load_batch_accounts},
    ID,
};

pub fn remove_stakes<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, StakeBatch<'info>>,
    choice_ids: Vec<ChoiceId>,
    amounts: Vec<u64>,
) -> Result<()> {
    let batch = fold_batch(&choice_ids, &amounts)?;
    let total = batch_total(&batch)?;

    let session_key = ctx.accounts.ledger_session.key();
    let staker = ctx.accounts.staker.key();
    let mut entries =
        load_batch_accounts(ctx.remaining_accounts, &session_key, &staker, &batch)?;

    // Any underflow aborts the instruction before a single byte is written back
    for ((record, position), (_, amount)) in entries.iter_mut().zip(batch.iter()) {
        position.debit(*amount)?;
        record.burn(*amount)?;
    }
    for (record, position) in entries.iter() {
        position.exit(&ID)?;
        record.exit(&ID)?;
    }

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
                from: ctx.accounts.vault.to_account_info(),
                to: ctx.accounts.staker_token_account.to_account_info(),
                authority: ctx.accounts.session_authority.to_account_info(),
            },
            signer_seeds,
        ),
        total,
    )?;

    msg!("Unstaked {} across {} choices", total, batch.len());
    emit!(StakesRemoved {
        session: session_key,
        staker,
        choice_ids,
        amounts,
        total,
    });
    Ok(())
}
