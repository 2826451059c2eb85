//! Concrete payment schedules.
//!
//! A schedule belongs to exactly one priced activity: a config row, its
//! expected payment items and, for guarantee schedules, a credit-card
//! guarantee. This module validates create/update requests and turns
//! templates into resolved, compliance-checked item sets.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::ScheduleError;
pub use service::ScheduleService;
pub use types::{
    AppliedSchedule, ApplyTemplateInput, CreateScheduleInput, CreditCardGuarantee, DepositSpec,
    DepositType, ExpectedItemInput, ExpectedPaymentItem, GuaranteeInput, ItemPatch,
    PaymentSchedule, PaymentScheduleConfig, PricedActivity, ResolvedItem, ScheduleSettings,
    ScheduleType, TemplateApplication, TemplatePlan, UpdateScheduleInput,
};
