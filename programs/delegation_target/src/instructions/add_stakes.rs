use anchor_lang::prelude::*;
use anchor_spl::token::{self, Approve};

use crate::{
    authorization::Intent,
    error::DelegationError,
    events::DelegationExecuted,
    instructions::{Args as _, DelegatedCall, DelegatedCallArgs},
    security::validation,
    state::DelegatedWallet,
};

pub fn add_stakes<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, DelegatedCall<'info>>,
    args: DelegatedCallArgs,
) -> Result<()> {
    // 0. Validate args
    args.validate()?;
    validation::validate_remaining_accounts(ctx.remaining_accounts)?;

    // 1. Authorize and burn the nonce
    let intent = Intent::AddStakes {
        choice_ids: &args.choice_ids,
        amounts: &args.amounts,
    };
    let nonce = ctx.accounts.consume_delegation(&args, &intent, ctx.bumps.wallet)?;

    // 2. Ceiling
    let total = ctx.accounts.config.check_ceiling(&args.amounts)?;

    let bump = [ctx.accounts.wallet.bump];
    let wallet_seeds: &[&[&[u8]]] =
        &[&[DelegatedWallet::PREFIX_SEED, args.holder.as_ref(), &bump]];

    // 3. Allowance for exactly the batch total
    token::approve(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Approve {
                to: ctx.accounts.holder_token_account.to_account_info(),
                delegate: ctx.accounts.session_authority.to_account_info(),
                authority: ctx.accounts.wallet.to_account_info(),
            },
            wallet_seeds,
        ),
        total,
    )?;

    // 4. Stake through the ledger under the wallet identity
    msg!(
        "Delegated add_stakes for wallet {} nonce {}",
        ctx.accounts.wallet.key(),
        nonce
    );
    choice_ledger::cpi::add_stakes(
        CpiContext::new_with_signer(
            ctx.accounts.ledger_program.to_account_info(),
            ctx.accounts.stake_batch_accounts(),
            wallet_seeds,
        )
        .with_remaining_accounts(ctx.remaining_accounts.to_vec()),
        args.choice_ids.clone(),
        args.amounts.clone(),
    )?;

    // 5. No allowance may survive the call
    ctx.accounts.holder_token_account.reload()?;
    require!(
        ctx.accounts.holder_token_account.delegated_amount == 0,
        DelegationError::AllowanceNotConsumed
    );

    DelegationExecuted::emit_event(
        ctx.accounts.wallet.key(),
        args.holder,
        ctx.accounts.relayer.key(),
        nonce,
        intent.label(),
        total,
    )
}
