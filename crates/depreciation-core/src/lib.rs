pub mod error;
pub mod types;

#[cfg(feature = "fixed_assets")]
pub mod fixed_assets;

pub use error::DepreciationError;
pub use types::*;

/// Standard result type for all depreciation operations
pub type DepreciationResult<T> = Result<T, DepreciationError>;
