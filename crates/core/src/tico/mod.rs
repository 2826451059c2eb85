//! TICO payment-schedule compliance.
//!
//! A stateless rule set run against a resolved schedule before it is
//! persisted. Hard errors block persistence; warnings travel alongside a
//! successful result.

pub mod rules;
pub mod types;
pub mod validator;

pub use rules::TicoRules;
pub use types::{IssueDetails, PaymentLine, Severity, TicoIssue, TicoIssueCode, TicoReport};
pub use validator::TicoValidator;
