//! Depreciation schedule computation.
//!
//! Schedules are pure functions of the asset's acquisition parameters:
//! the same asset always yields the same full schedule, and the batch
//! runner resumes it by matching the asset's current accumulated amount
//! against the schedule's prefix sums.

use rust_decimal::Decimal;
use tally_shared::types::{round_display, round_intermediate};

use super::error::DepreciationError;
use super::types::{DepreciationMethod, DepreciationScheduleRow, FixedAsset};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Validates asset acquisition parameters before persistence.
///
/// # Errors
///
/// Returns `DepreciationError` if the cost is not positive, the residual is
/// negative or exceeds the cost, or the useful life is zero.
pub fn validate_asset_inputs(
    purchase_cost: Decimal,
    residual_value: Decimal,
    useful_life_years: u32,
) -> Result<(), DepreciationError> {
    if purchase_cost <= Decimal::ZERO {
        return Err(DepreciationError::NonPositiveCost(purchase_cost));
    }
    if residual_value < Decimal::ZERO {
        return Err(DepreciationError::NegativeResidual(residual_value));
    }
    if residual_value > purchase_cost {
        return Err(DepreciationError::ResidualExceedsCost {
            residual: residual_value,
            cost: purchase_cost,
        });
    }
    if useful_life_years == 0 {
        return Err(DepreciationError::InvalidUsefulLife(useful_life_years));
    }
    Ok(())
}

/// Computes the full monthly schedule from acquisition.
///
/// The schedule is bounded by `useful_life_years * 12` periods. Both methods
/// share the floor rule: a period never drives book value below the residual,
/// and the final period lands book value on the residual exactly.
#[must_use]
pub fn compute_schedule(asset: &FixedAsset) -> Vec<DepreciationScheduleRow> {
    let total_periods = asset.total_periods();
    if total_periods == 0 || asset.purchase_cost - asset.residual_value <= Decimal::ZERO {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(total_periods as usize);
    let mut book = asset.purchase_cost;
    let mut accumulated = Decimal::ZERO;

    for period in 1..=total_periods {
        let remaining = book - asset.residual_value;
        if remaining <= Decimal::ZERO {
            break;
        }

        let mut amount = periodic_amount(asset, book);
        // Floor rule, and the bounded final period always closes the gap.
        if period == total_periods || book - amount < asset.residual_value {
            amount = remaining;
        }
        if amount <= Decimal::ZERO {
            break;
        }

        accumulated += amount;
        book -= amount;
        rows.push(DepreciationScheduleRow {
            period,
            depreciation_amount: amount,
            accumulated_depreciation: accumulated,
            book_value_after: book,
        });
    }

    rows
}

/// Returns the next unapplied schedule row for an asset.
///
/// The row is located by comparing the asset's current accumulated
/// depreciation against the schedule's running totals, so a partially
/// depreciated asset resumes exactly where it left off.
///
/// # Errors
///
/// Returns `AssetDisposed` for inactive assets and `FullyDepreciated` once
/// the schedule is exhausted.
pub fn next_step(asset: &FixedAsset) -> Result<DepreciationScheduleRow, DepreciationError> {
    if !asset.is_active {
        return Err(DepreciationError::AssetDisposed);
    }
    compute_schedule(asset)
        .into_iter()
        .find(|row| row.accumulated_depreciation > asset.accumulated_depreciation)
        .ok_or(DepreciationError::FullyDepreciated)
}

/// Raw periodic amount for the given method, before the floor rule.
///
/// Intermediates are rounded to 4 places, the result to 2, both with
/// banker's rounding.
fn periodic_amount(asset: &FixedAsset, book_value: Decimal) -> Decimal {
    match asset.method {
        DepreciationMethod::StraightLine => {
            let months = Decimal::from(asset.total_periods());
            let depreciable = asset.purchase_cost - asset.residual_value;
            round_display(round_intermediate(depreciable / months))
        }
        DepreciationMethod::DecliningBalance => {
            let rate =
                round_intermediate(Decimal::TWO / Decimal::from(asset.useful_life_years));
            round_display(round_intermediate(book_value * rate / MONTHS_PER_YEAR))
        }
    }
}
