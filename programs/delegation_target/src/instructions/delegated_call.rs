use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use choice_ledger::{cpi::accounts::StakeBatch, program::ChoiceLedger};

use crate::{
    authorization::Intent,
    error::DelegationError,
    instructions::DelegatedCallArgs,
    state::{DelegatedWallet, TargetConfig},
};

/// Accounts shared by delegated `add_stakes` and `remove_stakes`. Remaining
/// accounts are forwarded to the ledger untouched.
#[derive(Accounts)]
#[instruction(args: DelegatedCallArgs)]
pub struct DelegatedCall<'info> {
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
        address = config.ledger @ DelegationError::InvalidLedger,
    )]
    /// CHECK: pinned to the configured session
    pub ledger_session: UncheckedAccount<'info>,

    /// CHECK: seeds verified by the ledger
    pub session_authority: UncheckedAccount<'info>,

    /// CHECK: address verified by the ledger
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,

    pub ledger_program: Program<'info, ChoiceLedger>,

    pub token_program: Program<'info, Token>,

    pub system_program: Program<'info, System>,
}

impl<'info> DelegatedCall<'info> {
    pub fn consume_delegation(
        &mut self,
        args: &DelegatedCallArgs,
        intent: &Intent,
        wallet_bump: u8,
    ) -> Result<u64> {
        self.wallet.authorize(
            args.holder,
            wallet_bump,
            &args.authorization,
            &self.config,
            intent,
        )
    }

    pub fn stake_batch_accounts(&self) -> StakeBatch<'info> {
        StakeBatch {
            staker: self.wallet.to_account_info(),
            ledger_session: self.ledger_session.to_account_info(),
            session_authority: self.session_authority.to_account_info(),
            staker_token_account: self.holder_token_account.to_account_info(),
            vault: self.vault.to_account_info(),
            token_program: self.token_program.to_account_info(),
        }
    }
}
