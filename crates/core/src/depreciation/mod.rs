//! Fixed asset depreciation.
//!
//! Pure schedule computation lives here; the batch runner that applies a
//! period and posts the matching journal entry lives in the persistence
//! layer, built on `next_step`.

pub mod error;
pub mod schedule;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use error::DepreciationError;
pub use schedule::{compute_schedule, next_step, validate_asset_inputs};
pub use types::{DepreciationMethod, DepreciationScheduleRow, FixedAsset};
