//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - The acting-identity (`Actor`) and capability types
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{Actor, Capability, CapabilitySet};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
