//! Entity prelude.

pub use super::activity_pricing::Entity as ActivityPricing;
pub use super::credit_card_guarantees::Entity as CreditCardGuarantees;
pub use super::expected_payment_items::Entity as ExpectedPaymentItems;
pub use super::itineraries::Entity as Itineraries;
pub use super::itinerary_activities::Entity as ItineraryActivities;
pub use super::itinerary_days::Entity as ItineraryDays;
pub use super::payment_audit_logs::Entity as PaymentAuditLogs;
pub use super::payment_schedule_configs::Entity as PaymentScheduleConfigs;
pub use super::payment_schedule_template_items::Entity as PaymentScheduleTemplateItems;
pub use super::payment_schedule_templates::Entity as PaymentScheduleTemplates;
pub use super::payment_transactions::Entity as PaymentTransactions;
pub use super::trips::Entity as Trips;
