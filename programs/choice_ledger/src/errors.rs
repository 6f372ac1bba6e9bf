use anchor_lang::prelude::*;

#[error_code]
pub enum ChoiceLedgerError {
    #[msg("Ledger session is already initialized")]
    AlreadyInitialized,

    #[msg("Ledger session is not initialized")]
    NotInitialized,

    #[msg("Label must be between 1 and 32 bytes")]
    InvalidLabel,

    #[msg("choice_ids and amounts must have the same length")]
    LengthMismatch,

    #[msg("Batch must contain at least one choice")]
    EmptyBatch,

    #[msg("Amount arithmetic overflowed")]
    AmountOverflow,

    #[msg("Stake amount exceeds the holder's balance for this choice")]
    InsufficientStake,

    #[msg("Allowance granted to the session authority does not cover the batch")]
    InsufficientAllowance,

    #[msg("Choice name cannot be empty")]
    NameCannotBeEmpty,

    #[msg("Choice metadata is already set")]
    MetadataAlreadySet,

    #[msg("Choice name is too long")]
    NameTooLong,

    #[msg("Choice symbol is too long")]
    SymbolTooLong,

    #[msg("Choice uri is too long")]
    UriTooLong,

    #[msg("Token mint does not match the session value asset")]
    InvalidValueAsset,

    #[msg("Token account is not owned by the staker")]
    InvalidTokenAccount,

    #[msg("Vault does not belong to this session")]
    InvalidVault,

    #[msg("Missing choice or position account for the batch")]
    MissingBatchAccounts,

    #[msg("Choice record does not match the derived address")]
    ChoiceAccountMismatch,

    #[msg("Stake position does not match the derived address")]
    PositionAccountMismatch,

    #[msg("Cannot transfer a stake to its current holder")]
    SelfTransfer,
}
