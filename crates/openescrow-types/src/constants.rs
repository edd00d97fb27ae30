//! Reference policy constants for the OpenEscrow custody engine.

use rust_decimal::Decimal;

/// Inspection buffer after the deadline before auto-release opens (1 hour).
pub const DEFAULT_INSPECTION_PERIOD_SECS: u64 = 3_600;

/// Window after creation during which the funder may cancel (30 minutes).
pub const DEFAULT_CANCELLATION_WINDOW_SECS: u64 = 1_800;

/// Maximum custodied amount per record. `Decimal`'s 96-bit mantissa makes
/// this exactly the reference policy's 2^96 − 1 cap.
pub const DEFAULT_MAX_ESCROW_AMOUNT: Decimal = Decimal::MAX;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenEscrow";
