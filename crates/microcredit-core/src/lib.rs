pub mod error;
pub mod interest;
pub mod loan;
pub mod settings;
pub mod types;

#[cfg(feature = "provisioning")]
pub mod provisioning;

#[cfg(feature = "regrading")]
pub mod regrading;

pub use error::MicrocreditError;
pub use types::*;

/// Standard result type for all loan-servicing operations
pub type MicrocreditResult<T> = Result<T, MicrocreditError>;
