use anchor_lang::prelude::*;

/// Event emitted after every delegated ledger call
#[event]
pub struct DelegationExecuted {
    pub wallet: Pubkey,
    pub holder: [u8; 20],
    pub relayer: Pubkey,
    /// Nonce consumed by this call
    pub nonce: u64,
    pub operation: String,
    pub total: u64,
    pub timestamp: i64,
}

impl DelegationExecuted {
    pub fn emit_event(
        wallet: Pubkey,
        holder: [u8; 20],
        relayer: Pubkey,
        nonce: u64,
        operation: &str,
        total: u64,
    ) -> Result<()> {
        emit!(Self {
            wallet,
            holder,
            relayer,
            nonce,
            operation: operation.to_string(),
            total,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}

/// Event emitted once when the target is configured
#[event]
pub struct TargetInitialized {
    pub authority: Pubkey,
    pub value_asset: Pubkey,
    pub ledger: Pubkey,
    pub relayer: Pubkey,
    pub ceiling: u64,
    pub network_id: u64,
    pub require_commitment: bool,
}
