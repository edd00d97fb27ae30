//! Configuration for the OpenEscrow custody engine.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EscrowError, Result, constants};

/// Policy configuration for a custody engine instance.
///
/// The reference policy fixes these at deployment; this implementation takes
/// them at engine construction so operators can tune them per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Seconds after the deadline before permissionless auto-release opens.
    pub inspection_period_secs: u64,
    /// Seconds after creation during which the funder may cancel.
    pub cancellation_window_secs: u64,
    /// Maximum custodied amount per record.
    pub max_amount: Decimal,
}

impl EscrowConfig {
    /// The inspection buffer as a [`Duration`].
    #[must_use]
    pub fn inspection_period(&self) -> Duration {
        Duration::seconds(i64::try_from(self.inspection_period_secs).unwrap_or(i64::MAX))
    }

    /// The cancellation window as a [`Duration`].
    #[must_use]
    pub fn cancellation_window(&self) -> Duration {
        Duration::seconds(i64::try_from(self.cancellation_window_secs).unwrap_or(i64::MAX))
    }

    /// Reject nonsensical configurations before an engine is built on them.
    ///
    /// # Errors
    /// Returns [`EscrowError::Configuration`] if any window is zero or the
    /// amount cap is not positive.
    pub fn validate(&self) -> Result<()> {
        if self.inspection_period_secs == 0 {
            return Err(EscrowError::Configuration(
                "inspection_period_secs must be > 0".into(),
            ));
        }
        if self.cancellation_window_secs == 0 {
            return Err(EscrowError::Configuration(
                "cancellation_window_secs must be > 0".into(),
            ));
        }
        if self.max_amount <= Decimal::ZERO {
            return Err(EscrowError::Configuration(
                "max_amount must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            inspection_period_secs: constants::DEFAULT_INSPECTION_PERIOD_SECS,
            cancellation_window_secs: constants::DEFAULT_CANCELLATION_WINDOW_SECS,
            max_amount: constants::DEFAULT_MAX_ESCROW_AMOUNT,
        }
    }
}
