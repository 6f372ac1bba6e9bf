use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::{
    authorization::Intent,
    error::DelegationError,
    events::DelegationExecuted,
    instructions::{Args as _, WithdrawArgs},
    state::{DelegatedWallet, TargetConfig},
};

/// Move value out of the delegated wallet to the token account the holder
/// committed to.
pub fn withdraw(mut ctx: Context<DelegatedWithdraw>, args: WithdrawArgs) -> Result<()> {
    // 0. Validate args
    args.validate()?;

    // 1. Authorize against the committed destination and burn the nonce
    let destination = ctx.accounts.destination.key();
    let intent = Intent::Withdraw {
        destination: &destination,
        amount: args.amount,
    };
    let accounts = &mut ctx.accounts;
    let nonce = accounts.wallet.authorize(
        args.holder,
        ctx.bumps.wallet,
        &args.authorization,
        &accounts.config,
        &intent,
    )?;

    // 2. Transfer signed by the wallet
    let bump = [accounts.wallet.bump];
    let wallet_seeds: &[&[&[u8]]] =
        &[&[DelegatedWallet::PREFIX_SEED, args.holder.as_ref(), &bump]];
    token::transfer(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            Transfer {
                from: accounts.holder_token_account.to_account_info(),
                to: accounts.destination.to_account_info(),
                authority: accounts.wallet.to_account_info(),
            },
            wallet_seeds,
        ),
        args.amount,
    )?;

    msg!("Withdrew {} from wallet {} to {}", args.amount, accounts.wallet.key(), destination);
    DelegationExecuted::emit_event(
        accounts.wallet.key(),
        args.holder,
        accounts.relayer.key(),
        nonce,
        intent.label(),
        args.amount,
    )
}

#[derive(Accounts)]
#[instruction(args: WithdrawArgs)]
pub struct DelegatedWithdraw<'info> {
    #[account(
        mut,
        constraint = relayer.key() == config.relayer @ DelegationError::OnlyRelayer,
    )]
    pub relayer: Signer<'info>,

    #[account(
        seeds = [TargetConfig::PREFIX_SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, TargetConfig>>,

    #[account(
        init_if_needed,
        payer = relayer,
        space = 8 + DelegatedWallet::INIT_SPACE,
        seeds = [DelegatedWallet::PREFIX_SEED, args.holder.as_ref()],
        bump
    )]
    pub wallet: Box<Account<'info, DelegatedWallet>>,

    #[account(
        address = config.value_asset @ DelegationError::InvalidValueAsset,
    )]
    pub value_asset: Box<Account<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = value_asset,
        associated_token::authority = wallet,
    )]
    pub holder_token_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = value_asset,
    )]
    pub destination: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}
