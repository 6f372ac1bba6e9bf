use anchor_lang::prelude::*;

use crate::state::ChoiceId;

/// Event emitted when a ledger session is bound to its value asset
#[event]
pub struct SessionInitialized {
    pub session: Pubkey,
    pub value_asset: Pubkey,
    pub creator: Pubkey,
    pub label: String,
}

/// Event emitted when a choice receives its metadata
#[event]
pub struct ChoiceRegistered {
    pub session: Pubkey,
    pub choice_id: ChoiceId,
    pub creator: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

#[event]
pub struct StakesAdded {
    pub session: Pubkey,
    pub staker: Pubkey,
    pub choice_ids: Vec<ChoiceId>,
    pub amounts: Vec<u64>,
    pub total: u64,
}

#[event]
pub struct StakesRemoved {
    pub session: Pubkey,
    pub staker: Pubkey,
    pub choice_ids: Vec<ChoiceId>,
    pub amounts: Vec<u64>,
    pub total: u64,
}

#[event]
pub struct StakeTransferred {
    pub session: Pubkey,
    pub choice_id: ChoiceId,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}
