use anchor_lang::error_code;

#[error_code]
pub enum DelegationError {
    #[msg("Caller is not the configured relayer")]
    OnlyRelayer,

    #[msg("Delegation was signed for a different target")]
    TargetMismatch,

    #[msg("Delegation was signed for a different network")]
    NetworkMismatch,

    #[msg("Delegation nonce does not match the wallet sequence")]
    InvalidNonce,

    #[msg("Delegation signature is malformed or unrecoverable")]
    InvalidAuthorization,

    #[msg("Recovered signer does not own this delegated wallet")]
    SignerMismatch,

    #[msg("Delegation must carry an intent commitment")]
    CommitmentRequired,

    #[msg("Submitted batch does not match the signed commitment")]
    CommitmentMismatch,

    #[msg("Batch total exceeds the per-call ceiling")]
    AmountTooHigh,

    #[msg("Allowance survived the ledger call")]
    AllowanceNotConsumed,

    #[msg("choice_ids and amounts must be non-empty and of equal length")]
    InvalidBatch,

    #[msg("Batch exceeds the maximum number of choices per call")]
    BatchTooLarge,

    #[msg("Ledger session does not match the configured ledger")]
    InvalidLedger,

    #[msg("Ledger session is bound to a different value asset")]
    InvalidValueAsset,

    #[msg("Ceiling must be greater than zero")]
    InvalidCeiling,

    #[msg("Amount must be greater than zero")]
    InvalidAmount,

    AmountOverflow,

    NonceOverflow,
}

#[cfg(test)]
pub(crate) fn assert_delegation_error<T: std::fmt::Debug>(
    result: anchor_lang::Result<T>,
    expected: DelegationError,
) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(err.error_code_number, u32::from(expected))
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}
