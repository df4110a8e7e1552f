pub mod error;
pub mod rates;
pub mod time_value;
pub mod types;

#[cfg(feature = "forecast")]
pub mod forecast;

#[cfg(feature = "monte_carlo")]
pub mod monte_carlo;

#[cfg(feature = "goal")]
pub mod goal;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "budget")]
pub mod budget;

pub use error::FinicoError;
pub use types::*;

/// Standard result type for all finico operations
pub type FinicoResult<T> = Result<T, FinicoError>;
