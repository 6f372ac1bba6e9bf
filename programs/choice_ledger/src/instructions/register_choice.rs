use anchor_lang::prelude::*;

use crate::{
    errors::ChoiceLedgerError,
    events::ChoiceRegistered,
    state::{ChoiceRecord, LedgerSession},
    utils::derive_choice_id,
};

pub fn register_choice(
    ctx: Context<RegisterChoice>,
    salt: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
) -> Result<()> {
    let session_key = ctx.accounts.ledger_session.key();
    let creator = ctx.accounts.creator.key();
    let choice_id = derive_choice_id(&creator, &salt);

    let record = &mut ctx.accounts.choice_record;
    if !record.is_open() {
        record.open(session_key, choice_id, ctx.bumps.choice_record);
        let session = &mut ctx.accounts.ledger_session;
        session.choice_count = session
            .choice_count
            .checked_add(1)
            .ok_or(ChoiceLedgerError::AmountOverflow)?;
    }
    record.set_metadata(creator, name, symbol, uri)?;

    msg!("Choice registered under session {}", session_key);
    emit!(ChoiceRegistered {
        session: session_key,
        choice_id,
        creator,
        name: record.name.clone(),
        symbol: record.symbol.clone(),
        uri: record.uri.clone(),
    });
    Ok(())
}

#[derive(Accounts)]
#[instruction(salt: [u8; 32])]
pub struct RegisterChoice<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        constraint = ledger_session.initialized @ ChoiceLedgerError::NotInitialized,
    )]
    pub ledger_session: Box<Account<'info, LedgerSession>>,

    #[account(
        init_if_needed,
        payer = creator,
        space = 8 + ChoiceRecord::INIT_SPACE,
        seeds = [
            ChoiceRecord::PREFIX_SEED,
            ledger_session.key().as_ref(),
            derive_choice_id(&creator.key(), &salt).as_ref()
        ],
        bump
    )]
    pub choice_record: Box<Account<'info, ChoiceRecord>>,

    pub system_program: Program<'info, System>,
}
