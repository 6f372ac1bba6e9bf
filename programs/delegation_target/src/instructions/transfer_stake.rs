use anchor_lang::prelude::*;
use choice_ledger::{cpi::accounts::TransferStake, program::ChoiceLedger};

use crate::{
    authorization::Intent,
    error::DelegationError,
    events::DelegationExecuted,
    instructions::{Args as _, DelegatedTransferArgs},
    state::{DelegatedWallet, TargetConfig},
};

/// Hand a receipt balance held by the delegated wallet to the recipient
/// the holder committed to.
pub fn transfer_stake(mut ctx: Context<DelegatedTransfer>, args: DelegatedTransferArgs) -> Result<()> {
    // 0. Validate args
    args.validate()?;

    // 1. Authorize against the committed recipient and burn the nonce
    let recipient = ctx.accounts.recipient.key();
    let intent = Intent::TransferStake {
        recipient: &recipient,
        choice_id: &args.choice_id,
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

    // 2. Ledger transfer with the wallet as position owner
    let bump = [accounts.wallet.bump];
    let wallet_seeds: &[&[&[u8]]] =
        &[&[DelegatedWallet::PREFIX_SEED, args.holder.as_ref(), &bump]];
    choice_ledger::cpi::transfer_stake(
        CpiContext::new_with_signer(
            accounts.ledger_program.to_account_info(),
            TransferStake {
                payer: accounts.relayer.to_account_info(),
                owner: accounts.wallet.to_account_info(),
                recipient: accounts.recipient.to_account_info(),
                ledger_session: accounts.ledger_session.to_account_info(),
                choice_record: accounts.choice_record.to_account_info(),
                from_position: accounts.from_position.to_account_info(),
                to_position: accounts.to_position.to_account_info(),
                system_program: accounts.system_program.to_account_info(),
            },
            wallet_seeds,
        ),
        args.choice_id,
        args.amount,
    )?;

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
#[instruction(args: DelegatedTransferArgs)]
pub struct DelegatedTransfer<'info> {
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

    /// CHECK: only the key is used; bound by the commitment
    pub recipient: UncheckedAccount<'info>,

    #[account(
        address = config.ledger @ DelegationError::InvalidLedger,
    )]
    /// CHECK: pinned to the configured session
    pub ledger_session: UncheckedAccount<'info>,

    /// CHECK: seeds verified by the ledger
    pub choice_record: UncheckedAccount<'info>,

    /// CHECK: seeds verified by the ledger
    #[account(mut)]
    pub from_position: UncheckedAccount<'info>,

    /// CHECK: created or verified by the ledger
    #[account(mut)]
    pub to_position: UncheckedAccount<'info>,

    pub ledger_program: Program<'info, ChoiceLedger>,

    pub system_program: Program<'info, System>,
}
