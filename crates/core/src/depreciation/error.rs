//! Depreciation domain errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from fixed asset validation and depreciation stepping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DepreciationError {
    #[error("Purchase cost must be positive, got {0}")]
    NonPositiveCost(Decimal),

    #[error("Residual value {residual} exceeds purchase cost {cost}")]
    ResidualExceedsCost { residual: Decimal, cost: Decimal },

    #[error("Residual value must not be negative, got {0}")]
    NegativeResidual(Decimal),

    #[error("Useful life must be at least 1 year, got {0}")]
    InvalidUsefulLife(u32),

    #[error("Asset has been disposed and cannot be depreciated")]
    AssetDisposed,

    #[error("Asset is fully depreciated")]
    FullyDepreciated,
}
