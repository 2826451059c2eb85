//! `SeaORM` Entity for payment_transactions table.
//!
//! Rows are immutable once inserted; `amount_cents` is never negative and the
//! direction comes from `transaction_type`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expected_payment_item_id: Uuid,
    pub agency_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount_cents: i64,
    pub currency: String,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub transaction_date: Date,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expected_payment_items::Entity",
        from = "Column::ExpectedPaymentItemId",
        to = "super::expected_payment_items::Column::Id",
        on_delete = "Cascade"
    )]
    ExpectedPaymentItems,
}

impl Related<super::expected_payment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpectedPaymentItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
