use anchor_lang::prelude::*;

use crate::{
    errors::ChoiceLedgerError,
    state::{ChoiceId, ChoiceRecord, LedgerSession, StakePosition},
};

/// Safe to repeat: existing records and positions are left untouched.
pub fn open_position(ctx: Context<OpenPosition>, choice_id: ChoiceId) -> Result<()> {
    let session_key = ctx.accounts.ledger_session.key();

    let record = &mut ctx.accounts.choice_record;
    if !record.is_open() {
        record.open(session_key, choice_id, ctx.bumps.choice_record);
        let session = &mut ctx.accounts.ledger_session;
        session.choice_count = session
            .choice_count
            .checked_add(1)
            .ok_or(ChoiceLedgerError::AmountOverflow)?;
    }

    let position = &mut ctx.accounts.position;
    if !position.is_open() {
        position.open(
            session_key,
            ctx.accounts.holder.key(),
            choice_id,
            ctx.bumps.position,
        );
    }
    Ok(())
}

#[derive(Accounts)]
#[instruction(choice_id: ChoiceId)]
pub struct OpenPosition<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: any holder may own a position; only its key is used
    pub holder: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = ledger_session.initialized @ ChoiceLedgerError::NotInitialized,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + ChoiceRecord::INIT_SPACE,
        seeds = [ChoiceRecord::PREFIX_SEED, ledger_session.key().as_ref(), choice_id.as_ref()],
        bump
    )]
    pub choice_record: Box<Account<'info, ChoiceRecord>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + StakePosition::INIT_SPACE,
        seeds = [
            StakePosition::PREFIX_SEED,
            ledger_session.key().as_ref(),
            holder.key().as_ref(),
            choice_id.as_ref()
        ],
        bump
    )]
    pub position: Box<Account<'info, StakePosition>>,

    pub system_program: Program<'info, System>,
}
