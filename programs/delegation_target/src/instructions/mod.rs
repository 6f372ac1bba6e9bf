pub mod add_stakes;
pub mod args;
pub mod delegated_call;
pub mod initialize;
pub mod remove_stakes;
pub mod transfer_stake;
pub mod withdraw;

pub use add_stakes::*;
pub use args::*;
pub use delegated_call::*;
pub use initialize::*;
pub use remove_stakes::*;
pub use transfer_stake::*;
pub use withdraw::*;
