use anchor_lang::prelude::*;

use crate::{
    errors::ChoiceLedgerError,
    events::StakeTransferred,
    state::{ChoiceId, ChoiceRecord, LedgerSession, StakePosition},
};

pub fn transfer_stake(ctx: Context<TransferStake>, choice_id: ChoiceId, amount: u64) -> Result<()> {
    let session_key = ctx.accounts.ledger_session.key();
    let recipient = ctx.accounts.recipient.key();

    ctx.accounts.from_position.debit(amount)?;

    let to_position = &mut ctx.accounts.to_position;
    if !to_position.is_open() {
        to_position.open(session_key, recipient, choice_id, ctx.bumps.to_position);
    }
    to_position.credit(amount)?;

    emit!(StakeTransferred {
        session: session_key,
        choice_id,
        from: ctx.accounts.owner.key(),
        to: recipient,
        amount,
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(choice_id: ChoiceId)]
pub struct TransferStake<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    pub owner: Signer<'info>,

    #[account(
        constraint = recipient.key() != owner.key() @ ChoiceLedgerError::SelfTransfer,
    )]
    /// CHECK: only the key is used
    pub recipient: UncheckedAccount<'info>,

    #[account(
        constraint = ledger_session.initialized @ ChoiceLedgerError::NotInitialized,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    #[account(
        seeds = [ChoiceRecord::PREFIX_SEED, ledger_session.key().as_ref(), choice_id.as_ref()],
        bump = choice_record.bump,
    )]
    pub choice_record: Box<Account<'info, ChoiceRecord>>,

    #[account(
        mut,
        seeds = [
            StakePosition::PREFIX_SEED,
            ledger_session.key().as_ref(),
            owner.key().as_ref(),
            choice_id.as_ref()
        ],
        bump = from_position.bump,
    )]
    pub from_position: Box<Account<'info, StakePosition>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + StakePosition::INIT_SPACE,
        seeds = [
            StakePosition::PREFIX_SEED,
            ledger_session.key().as_ref(),
            recipient.key().as_ref(),
            choice_id.as_ref()
        ],
        bump
    )]
    pub to_position: Box<Account<'info, StakePosition>>,

    pub system_program: Program<'info, System>,
}
