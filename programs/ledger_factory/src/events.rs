use anchor_lang::prelude::*;

#[event]
pub struct LedgerDeployed {
    pub factory: Pubkey,
    pub instance: Pubkey,
    pub value_asset: Pubkey,
    pub label: String,
    /// None for keypair-addressed deployments
    pub salt: Option<[u8; 32]>,
    pub index: u64,
}
