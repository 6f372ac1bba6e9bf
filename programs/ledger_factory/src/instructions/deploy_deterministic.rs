use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use choice_ledger::{
    cpi::accounts::InitializeDeterministic as LedgerInitializeDeterministic,
    program::ChoiceLedger, state::LedgerSession,
};

use crate::{
    error::FactoryError,
    events::LedgerDeployed,
    state::{Deployment, Factory},
};

pub fn deploy_deterministic(
    ctx: Context<DeployDeterministic>,
    label: String,
    salt: [u8; 32],
) -> Result<Pubkey> {
    require!(
        ctx.accounts.instance.data_is_empty()
            && ctx.accounts.deployment.instance == Pubkey::default(),
        FactoryError::AlreadyDeployed
    );

    let index = ctx.accounts.factory.next_index()?;
    let factory_key = ctx.accounts.factory.key();
    let instance = ctx.accounts.instance.key();

    let deployment = &mut ctx.accounts.deployment;
    deployment.factory = factory_key;
    deployment.instance = instance;
    deployment.salt = salt;
    deployment.index = index;
    deployment.bump = ctx.bumps.deployment;

    let bump = [ctx.accounts.factory.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[Factory::PREFIX_SEED, &bump]];
    choice_ledger::cpi::initialize_deterministic(
        CpiContext::new_with_signer(
            ctx.accounts.ledger_program.to_account_info(),
            LedgerInitializeDeterministic {
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
        salt,
        label.clone(),
    )?;

    msg!("Deployed ledger session {} at index {}", instance, index);
    emit!(LedgerDeployed {
        factory: factory_key,
        instance,
        value_asset: ctx.accounts.value_asset.key(),
        label,
        salt: Some(salt),
        index,
    });
    Ok(instance)
}

#[derive(Accounts)]
#[instruction(label: String, salt: [u8; 32])]
pub struct DeployDeterministic<'info> {
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

    /// CHECK: address pinned to the predicted session PDA; emptiness checked in the handler
    #[account(
        mut,
        seeds = [LedgerSession::PREFIX_SEED, factory.key().as_ref(), salt.as_ref()],
        bump,
        seeds::program = ledger_program.key(),
    )]
    pub instance: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Deployment::INIT_SPACE,
        seeds = [Deployment::PREFIX_SEED, factory.key().as_ref(), salt.as_ref()],
        bump
    )]
    pub deployment: Box<Account<'info, Deployment>>,

    pub value_asset: Box<Account<'info, Mint>>,

    /// CHECK: seeds verified by the ledger
    pub session_authority: UncheckedAccount<'info>,

    /// CHECK: created by the ledger
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}
