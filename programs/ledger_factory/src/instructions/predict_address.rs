use anchor_lang::prelude::*;

use crate::{state::Factory, utils};

pub fn predict_address(ctx: Context<PredictAddress>, salt: [u8; 32]) -> Result<Pubkey> {
    Ok(utils::predict_address(&ctx.accounts.factory.key(), &salt))
}

#[derive(Accounts)]
pub struct PredictAddress<'info> {
    #[account(
        seeds = [Factory::PREFIX_SEED],
        bump = factory.bump,
    )]
    pub factory: Box<Account<'info, Factory>>,
}
