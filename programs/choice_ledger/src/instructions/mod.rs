pub mod add_stakes;
pub mod initialize;
pub mod open_position;
pub mod register_choice;
pub mod remove_stakes;
pub mod transfer_stake;

pub use add_stakes::*;
pub use initialize::*;
pub use open_position::*;
pub use register_choice::*;
pub use remove_stakes::*;
pub use transfer_stake::*;
