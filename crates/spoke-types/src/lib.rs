//! Shared types for the spoke-chain dispatch layer.
//!
//! Everything that crosses a crate boundary lives here: the closed set of
//! chain families, chain configuration, operation parameters, the
//! prepare/submit mode markers, chain-native transaction shapes and the
//! error taxonomy surfaced to callers.

pub mod chains;
pub mod delivery;
pub mod errors;
pub mod mode;
pub mod params;
pub mod transactions;
pub mod validation;

pub use chains::*;
pub use delivery::*;
pub use errors::*;
pub use mode::*;
pub use params::*;
pub use transactions::*;
pub use validation::*;
