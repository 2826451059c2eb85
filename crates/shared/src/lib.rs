//! Shared types, errors, and configuration for Wayfare.
//!
//! This crate provides common types used across all other crates:
//! - ISO 4217 currency codes and cent formatting
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ComplianceConfig, DatabaseConfig, ReportingConfig};
pub use error::{AppError, AppResult, ErrorBody};
pub use types::{CurrencyCode, format_cents};
