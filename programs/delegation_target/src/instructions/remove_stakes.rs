use anchor_lang::prelude::*;

use crate::{
    authorization::Intent,
    events::DelegationExecuted,
    instructions::{Args as _, DelegatedCall, DelegatedCallArgs},
    security::validation,
    state::DelegatedWallet,
};

pub fn remove_stakes<'c: 'info, 'info>(
    ctx: Context<'_, '_, 'c, 'info, DelegatedCall<'info>>,
    args: DelegatedCallArgs,
) -> Result<()> {
    // 0. Validate args
    args.validate()?;
    validation::validate_remaining_accounts(ctx.remaining_accounts)?;

    // 1. Authorize and burn the nonce
    let intent = Intent::RemoveStakes {
        choice_ids: &args.choice_ids,
        amounts: &args.amounts,
    };
    let nonce = ctx.accounts.consume_delegation(&args, &intent, ctx.bumps.wallet)?;
    let total = validation::batch_total(&args.amounts)?;

    // 2. Withdraw through the ledger; no ceiling on the way out
    let bump = [ctx.accounts.wallet.bump];
    let wallet_seeds: &[&[&[u8]]] =
        &[&[DelegatedWallet::PREFIX_SEED, args.holder.as_ref(), &bump]];
    choice_ledger::cpi::remove_stakes(
        CpiContext::new_with_signer(
            ctx.accounts.ledger_program.to_account_info(),
            ctx.accounts.stake_batch_accounts(),
            wallet_seeds,
        )
        .with_remaining_accounts(ctx.remaining_accounts.to_vec()),
        args.choice_ids.clone(),
        args.amounts.clone(),
    )?;

    DelegationExecuted::emit_event(
        ctx.accounts.wallet.key(),
        args.holder,
        ctx.accounts.relayer.key(),
        nonce,
        intent.label(),
        total,
    )
}
