//! Core payment schedule logic for Wayfare.
//!
//! This crate contains pure business logic with ZERO database dependencies.
//! Storage loads records and hands them here; everything that decides an
//! amount, a date, a status or a compliance finding lives in this crate.
//!
//! # Modules
//!
//! - `calc` - Cent arithmetic, rounding reconciliation, relative dates
//! - `tico` - Payment timing and sizing compliance rules
//! - `template` - Template item-set validation
//! - `schedule` - Schedule validation and template resolution
//! - `payments` - Transaction validation and paid-amount cache recomputation
//! - `booking` - Trip-wide booking status aggregation
//! - `audit` - Audit entry model

pub mod audit;
pub mod booking;
pub mod calc;
pub mod payments;
pub mod schedule;
pub mod template;
pub mod tico;
