//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{BALANCE_EPSILON, approx_equal, round_display, round_intermediate};
