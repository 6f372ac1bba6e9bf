use anchor_lang::error_code;

#[error_code]
pub enum FactoryError {
    #[msg("A ledger session already exists for this salt")]
    AlreadyDeployed,

    #[msg("Template program does not match the factory binding")]
    InvalidTemplate,

    CounterOverflow,
}
