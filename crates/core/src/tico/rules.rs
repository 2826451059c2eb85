//! Compliance thresholds.

use wayfare_shared::ComplianceConfig;

/// Thresholds the validator enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicoRules {
    /// Minimum days between the final payment due date and departure.
    pub min_days_before_departure: i64,
    /// Minimum single payment, in cents.
    pub min_payment_cents: i64,
    /// Maximum number of payment items.
    pub max_installments: usize,
    /// Deposit share (percent of total) above which a warning is raised.
    pub high_deposit_percent: i64,
}

impl TicoRules {
    /// Final payment must be due at least this many days before departure.
    pub const MIN_DAYS_BEFORE_DEPARTURE: i64 = 45;
    /// Payments under $1.00 are rejected.
    pub const MIN_PAYMENT_CENTS: i64 = 100;
    /// At most twelve installments.
    pub const MAX_INSTALLMENTS: usize = 12;
    /// Deposits above half the total are flagged.
    pub const HIGH_DEPOSIT_PERCENT: i64 = 50;
}

impl Default for TicoRules {
    fn default() -> Self {
        Self {
            min_days_before_departure: Self::MIN_DAYS_BEFORE_DEPARTURE,
            min_payment_cents: Self::MIN_PAYMENT_CENTS,
            max_installments: Self::MAX_INSTALLMENTS,
            high_deposit_percent: Self::HIGH_DEPOSIT_PERCENT,
        }
    }
}

impl From<&ComplianceConfig> for TicoRules {
    fn from(config: &ComplianceConfig) -> Self {
        Self {
            min_days_before_departure: config.min_days_before_departure,
            min_payment_cents: config.min_payment_cents,
            max_installments: config.max_installments,
            high_deposit_percent: config.high_deposit_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_regulatory_defaults() {
        assert_eq!(TicoRules::from(&ComplianceConfig::default()), TicoRules::default());
    }
}
