//! Relay that turns holder-signed delegations into relayer-paid staking
//! transactions against the delegation target program.

pub mod config;
pub mod error;
pub mod policy;
pub mod rpc;
pub mod server;
pub mod settlement;
pub mod wire;

pub use config::RelayConfig;
pub use error::RelayError;
pub use server::{router, AppState};
pub use settlement::Settlement;
