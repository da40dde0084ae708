//! Period-lock guard.
//!
//! This module implements the temporal access-control state machine:
//! - Period lock domain type and lock state transitions
//! - Date-in-locked-range checks consulted by every writer
//! - Overlap validation for new lock ranges
//! - Next-period suggestion for contiguous locking

pub mod error;
pub mod lock;

pub use error::PeriodLockError;
pub use lock::{PeriodLock, is_date_locked, suggest_next_lock_period, validate_new_range};
