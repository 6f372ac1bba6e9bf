use anchor_lang::prelude::*;
use choice_ledger::program::ChoiceLedger;

use crate::state::Factory;

pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    factory.template = ctx.accounts.ledger_program.key();
    factory.authority = ctx.accounts.authority.key();
    factory.deployments = 0;
    factory.bump = ctx.bumps.factory;

    msg!("Factory bound to template {}", factory.template);
    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        init,
        payer = authority,
        space = 8 + Factory::INIT_SPACE,
        seeds = [Factory::PREFIX_SEED],
        bump
    )]
    pub factory: Box<Account<'info, Factory>>,

    pub ledger_program: Program<'info, ChoiceLedger>,

    pub system_program: Program<'info, System>,
}
