//! `SeaORM` string-backed enums shared by the payment tables.
//!
//! Each enum mirrors a `wayfare_core` enum and converts both ways, so
//! repositories never pass raw strings around.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use wayfare_core::{booking, payments, schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ScheduleType {
    #[sea_orm(string_value = "full")]
    Full,
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "installments")]
    Installments,
    #[sea_orm(string_value = "guarantee")]
    Guarantee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DepositType {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed_amount")]
    FixedAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum TransactionType {
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "refund")]
    Refund,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ActivityType {
    #[sea_orm(string_value = "flight")]
    Flight,
    #[sea_orm(string_value = "lodging")]
    Lodging,
    #[sea_orm(string_value = "dining")]
    Dining,
    #[sea_orm(string_value = "cruise")]
    Cruise,
    #[sea_orm(string_value = "package")]
    Package,
    #[sea_orm(string_value = "transportation")]
    Transportation,
    #[sea_orm(string_value = "tour")]
    Tour,
    #[sea_orm(string_value = "other")]
    Other,
}

// ============================================================================
// Conversions to and from core enums
// ============================================================================

macro_rules! mirror_enum {
    ($name:ident in $module:ident, [$($variant:ident),+ $(,)?]) => {
        impl From<$name> for $module::$name {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$module::$name> for $name {
            fn from(value: $module::$name) -> Self {
                match value {
                    $($module::$name::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(ScheduleType in schedule, [Full, Deposit, Installments, Guarantee]);
mirror_enum!(DepositType in schedule, [Percentage, FixedAmount]);
mirror_enum!(PaymentStatus in payments, [Pending, Partial, Paid, Overdue]);
mirror_enum!(TransactionType in payments, [Payment, Refund, Adjustment]);
mirror_enum!(
    ActivityType in booking,
    [Flight, Lodging, Dining, Cruise, Package, Transportation, Tour, Other]
);
