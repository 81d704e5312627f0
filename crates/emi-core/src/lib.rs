pub mod emi;
pub mod error;
pub mod schedule;
pub mod sensitivity;
pub mod types;

pub use error::{EmiError, INVALID_INPUT_MESSAGE};
pub use types::*;

/// Standard result type for all emi-core operations
pub type EmiResult<T> = Result<T, EmiError>;
