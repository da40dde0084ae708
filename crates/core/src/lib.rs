//! Core business logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `registry` - Chart of accounts tree and parent validation
//! - `period` - Period-lock guard state machine
//! - `posting` - Double-entry journal validation
//! - `depreciation` - Depreciation schedules for fixed assets

pub mod depreciation;
pub mod period;
pub mod posting;
pub mod registry;
