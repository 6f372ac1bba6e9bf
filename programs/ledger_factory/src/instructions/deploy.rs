use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use choice_ledger::{cpi::accounts::Initialize as LedgerInitialize, program::ChoiceLedger};

use crate::{error::FactoryError, events::LedgerDeployed, state::Factory};

pub fn deploy(ctx: Context<Deploy>, label: String) -> Result<Pubkey> {
    let index = ctx.accounts.factory.next_index()?;
    let instance = ctx.accounts.instance.key();

    let bump = [ctx.accounts.factory.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[Factory::PREFIX_SEED, &bump]];
    choice_ledger::cpi::initialize(
        CpiContext::new_with_signer(
            ctx.accounts.ledger_program.to_account_info(),
            LedgerInitialize {
                payer: ctx.accounts.payer.to_account_info(),
                creator: ctx.accounts.factory.to_account_info(),
                ledger_session: ctx.accounts.instance.to_account_info(),
                value_asset: ctx.accounts.value_asset.to_account_info(),
                session_authority: ctx.accounts.session_authority.to_account_info(),
                vault: ctx.accounts.vault.to_account_info(),
                token_program: ctx.accounts.token_program.to_account_info(),
                system_program: ctx.accounts.system_program.to_account_info(),
            },
            signer_seeds,
        ),
        label.clone(),
    )?;

    emit!(LedgerDeployed {
        factory: ctx.accounts.factory.key(),
        instance,
        value_asset: ctx.accounts.value_asset.key(),
        label,
        salt: None,
        index,
    });
    Ok(instance)
}

#[derive(Accounts)]
pub struct Deploy<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [Factory::PREFIX_SEED],
        bump = factory.bump,
    )]
    pub factory: Box<Account<'info, Factory>>,

    #[account(
        address = factory.template @ FactoryError::InvalidTemplate,
    )]
    pub ledger_program: Program<'info, ChoiceLedger>,

    /// Fresh keypair account, created and bound by the ledger
    #[account(mut)]
    pub instance: Signer<'info>,

    pub value_asset: Box<Account<'info, Mint>>,

    /// CHECK: seeds verified by the ledger
    pub session_authority: UncheckedAccount<'info>,

    /// CHECK: created by the ledger
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}
