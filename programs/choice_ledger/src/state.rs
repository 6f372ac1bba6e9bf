use anchor_lang::prelude::*;

use crate::errors::ChoiceLedgerError;

pub const MAX_LABEL_LEN: usize = 32;
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

/// Opaque 256-bit choice identifier, big-endian.
pub type ChoiceId = [u8; 32];

/// One instance of the ledger. Sibling sessions share the program logic
/// and nothing else.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct LedgerSession {
    /// SPL mint staked into this session
    pub value_asset: Pubkey,
    #[max_len(32)]
    pub label: String,
    /// Signer that initialized the session (the factory PDA when deployed
    /// through the factory)
    pub creator: Pubkey,
    /// Token account holding every staked unit, owned by the session authority
    pub vault: Pubkey,
    /// Number of choice records opened under this session
    pub choice_count: u64,
    pub initialized: bool,
    pub authority_bump: u8,
}

impl LedgerSession {
    pub const PREFIX_SEED: &'static [u8] = b"ledger_session";
    pub const AUTHORITY_SEED: &'static [u8] = b"session_authority";
    pub const VAULT_SEED: &'static [u8] = b"vault";

    /// Write the immutable binding. Fails if the session was bound before.
    pub fn bind(
        &mut self,
        value_asset: Pubkey,
        label: String,
        creator: Pubkey,
        vault: Pubkey,
        authority_bump: u8,
    ) -> Result<()> {
        require!(!self.initialized, ChoiceLedgerError::AlreadyInitialized);
        require!(
            !label.is_empty() && label.len() <= MAX_LABEL_LEN,
            ChoiceLedgerError::InvalidLabel
        );

        *self = LedgerSession {
            value_asset,
            label,
            creator,
            vault,
            choice_count: 0,
            initialized: true,
            authority_bump,
        };
        Ok(())
    }
}

/// Aggregate supply and write-once metadata of one choice
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct ChoiceRecord {
    pub session: Pubkey,
    pub choice_id: [u8; 32],
    /// Zero until metadata is registered
    pub creator: Pubkey,
    #[max_len(32)]
    pub name: String,
    #[max_len(10)]
    pub symbol: String,
    #[max_len(200)]
    pub uri: String,
    pub total_supply: u64,
    pub bump: u8,
}

impl ChoiceRecord {
    pub const PREFIX_SEED: &'static [u8] = b"choice";

    pub fn is_open(&self) -> bool {
        self.session != Pubkey::default()
    }

    pub fn open(&mut self, session: Pubkey, choice_id: ChoiceId, bump: u8) {
        self.session = session;
        self.choice_id = choice_id;
        self.bump = bump;
    }

    pub fn has_metadata(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn set_metadata(
        &mut self,
        creator: Pubkey,
        name: String,
        symbol: String,
        uri: String,
    ) -> Result<()> {
        require!(!name.is_empty(), ChoiceLedgerError::NameCannotBeEmpty);
        require!(!self.has_metadata(), ChoiceLedgerError::MetadataAlreadySet);
        require!(name.len() <= MAX_NAME_LEN, ChoiceLedgerError::NameTooLong);
        require!(
            symbol.len() <= MAX_SYMBOL_LEN,
            ChoiceLedgerError::SymbolTooLong
        );
        require!(uri.len() <= MAX_URI_LEN, ChoiceLedgerError::UriTooLong);

        self.creator = creator;
        self.name = name;
        self.symbol = symbol;
        self.uri = uri;
        Ok(())
    }

    pub fn mint(&mut self, amount: u64) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ChoiceLedgerError::AmountOverflow)?;
        Ok(())
    }

    pub fn burn(&mut self, amount: u64) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(ChoiceLedgerError::InsufficientStake)?;
        Ok(())
    }
}

/// Receipt balance of one holder for one choice
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct StakePosition {
    pub session: Pubkey,
    pub holder: Pubkey,
    pub choice_id: [u8; 32],
    pub amount: u64,
    pub bump: u8,
}

impl StakePosition {
    pub const PREFIX_SEED: &'static [u8] = b"position";

    pub fn is_open(&self) -> bool {
        self.holder != Pubkey::default()
    }

    pub fn open(&mut self, session: Pubkey, holder: Pubkey, choice_id: ChoiceId, bump: u8) {
        self.session = session;
        self.holder = holder;
        self.choice_id = choice_id;
        self.bump = bump;
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(ChoiceLedgerError::AmountOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_sub(amount)
            .ok_or(ChoiceLedgerError::InsufficientStake)?;
        Ok(())
    }
}
