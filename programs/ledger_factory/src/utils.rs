use anchor_lang::prelude::*;
use choice_ledger::{state::LedgerSession, utils::deterministic_session_address};

use crate::{
    state::{Deployment, Factory},
    ID,
};

pub fn factory_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[Factory::PREFIX_SEED], &ID)
}

/// Address `deploy_deterministic` will produce for `salt`. A pure function
/// of the template program, the factory and the salt.
pub fn predict_address(factory: &Pubkey, salt: &[u8; 32]) -> Pubkey {
    deterministic_session_address(factory, salt)
}

pub fn deployment_address(factory: &Pubkey, salt: &[u8; 32]) -> Pubkey {
    Pubkey::find_program_address(&[Deployment::PREFIX_SEED, factory.as_ref(), salt], &ID).0
}

/// Session authority and vault of a session created through the factory
pub fn session_accounts(instance: &Pubkey) -> (Pubkey, Pubkey) {
    let authority = Pubkey::find_program_address(
        &[LedgerSession::AUTHORITY_SEED, instance.as_ref()],
        &choice_ledger::ID,
    )
    .0;
    (authority, choice_ledger::utils::vault_address(instance))
}
