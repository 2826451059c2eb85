//! Priced activity lookup.
//!
//! Activity pricing rows are owned by the itinerary services. The payment
//! repositories only need the total, the currency and the owning agency.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;
use wayfare_core::schedule::PricedActivity;

use super::convert;
use crate::entities::activity_pricing;

/// Resolves an activity pricing ID to the record a schedule hangs off.
#[async_trait]
pub trait PricedActivityLookup: Send + Sync {
    /// Returns the priced activity, or `None` when no such pricing exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself fails.
    async fn find_priced_activity(&self, id: Uuid) -> Result<Option<PricedActivity>, DbErr>;
}

/// Activity pricing repository.
#[derive(Debug, Clone)]
pub struct ActivityPricingRepository {
    db: DatabaseConnection,
}

impl ActivityPricingRepository {
    /// Creates a new activity pricing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a priced activity within an agency.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_for_agency(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<PricedActivity>, DbErr> {
        Ok(load(&self.db, id)
            .await?
            .filter(|activity| activity.agency_id == agency_id))
    }
}

#[async_trait]
impl PricedActivityLookup for ActivityPricingRepository {
    async fn find_priced_activity(&self, id: Uuid) -> Result<Option<PricedActivity>, DbErr> {
        load(&self.db, id).await
    }
}

/// Loads a priced activity on any connection or transaction.
pub(crate) async fn load<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<PricedActivity>, DbErr> {
    activity_pricing::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(convert::priced_activity)
        .transpose()
}
