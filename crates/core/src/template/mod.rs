//! Payment schedule templates.
//!
//! A template is an agency-level blueprint: each item carries an amount
//! rule (percentage or fixed cents) and a timing rule (days after booking
//! or days before departure). Dates are only resolved when the template is
//! applied to a priced activity.

pub mod error;
pub mod service;
pub mod types;

pub use error::TemplateError;
pub use service::TemplateService;
pub use types::{
    AmountSpec, CreateTemplateInput, PaymentScheduleTemplate, TemplateItem, TemplateItemPayload,
    TimingSpec, UpdateTemplateInput,
};
