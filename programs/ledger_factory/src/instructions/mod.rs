pub mod deploy;
pub mod deploy_deterministic;
pub mod initialize;
pub mod predict_address;

pub use deploy::*;
pub use deploy_deterministic::*;
pub use initialize::*;
pub use predict_address::*;
