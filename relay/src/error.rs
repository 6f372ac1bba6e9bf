use axum::http::StatusCode;
use thiserror::Error;

/// Every way a submission can fail. `kind()` is the machine-readable name
/// returned to clients.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("network {got} does not match configured network {expected}")]
    NetworkMismatch { expected: u64, got: u64 },

    #[error("target {0} is not allow-listed")]
    TargetNotAllowed(String),

    #[error("choice {0} is not approved")]
    ChoiceNotApproved(String),

    #[error("amount at index {0} must be greater than zero")]
    InvalidAmount(usize),

    #[error("total {total} exceeds ceiling {ceiling}")]
    AmountTooHigh { total: String, ceiling: u64 },

    #[error("authorization is invalid: {0}")]
    InvalidAuthorization(String),

    #[error("delegation does not commit to the submitted batch")]
    CommitmentRequired,

    #[error("submitted batch does not match the signed commitment")]
    CommitmentMismatch,

    #[error("execution failed: {0}")]
    ExecutionFailure(String),
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "MalformedRequest",
            Self::NetworkMismatch { .. } => "NetworkMismatch",
            Self::TargetNotAllowed(_) => "TargetNotAllowed",
            Self::ChoiceNotApproved(_) => "ChoiceNotApproved",
            Self::InvalidAmount(_) => "InvalidAmount",
            Self::AmountTooHigh { .. } => "AmountTooHigh",
            Self::InvalidAuthorization(_) => "InvalidAuthorization",
            Self::CommitmentRequired => "CommitmentRequired",
            Self::CommitmentMismatch => "CommitmentMismatch",
            Self::ExecutionFailure(_) => "ExecutionFailure",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::TargetNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::ExecutionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
