mod config;
mod delegated_wallet;

pub use config::*;
pub use delegated_wallet::*;
