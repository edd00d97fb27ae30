//! Error types for the OpenEscrow custody engine.
//!
//! All errors use the `ES_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Creation / validation errors
//! - 2xx: Authorization errors
//! - 3xx: Record / state errors
//! - 4xx: Timing errors
//! - 5xx: Transfer errors
//! - 6xx: Guard errors
//! - 9xx: General / configuration errors

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{EscrowId, EscrowState};

/// Central error enum for all OpenEscrow operations.
///
/// Every error is a terminal, locally surfaced failure of the single
/// operation that raised it — nothing in this core retries automatically.
#[derive(Debug, Error)]
pub enum EscrowError {
    // =================================================================
    // Creation / Validation Errors (1xx)
    // =================================================================
    /// The beneficiary is the null identity.
    #[error("ES_ERR_100: invalid receiver: beneficiary is the null identity")]
    InvalidReceiver,

    /// The amount is zero, negative, or above the configured maximum.
    #[error("ES_ERR_101: invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    /// The deadline is not strictly in the future.
    #[error("ES_ERR_102: invalid deadline: must be after the current time")]
    InvalidDeadline,

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller lacks the role required for the requested transition.
    #[error("ES_ERR_200: unauthorized: caller lacks the required role")]
    Unauthorized,

    /// The proposed arbitrator is the null identity.
    #[error("ES_ERR_201: invalid arbitrator: the null identity cannot arbitrate")]
    InvalidArbitrator,

    // =================================================================
    // Record / State Errors (3xx)
    // =================================================================
    /// The requested escrow id was never allocated.
    #[error("ES_ERR_300: escrow not found: {0}")]
    EscrowNotFound(EscrowId),

    /// The record is not in the state required for the requested transition.
    #[error("ES_ERR_301: invalid state: cannot transition from {from} to {to}")]
    InvalidState { from: EscrowState, to: EscrowState },

    // =================================================================
    // Timing Errors (4xx)
    // =================================================================
    /// Auto-release attempted before `deadline + inspection_period`.
    #[error("ES_ERR_400: deadline not reached: auto-release opens at {opens_at}")]
    DeadlineNotReached { opens_at: DateTime<Utc> },

    /// Cancellation attempted after the bounded window.
    #[error("ES_ERR_401: cancellation window closed at {closed_at}")]
    CancellationWindowExpired { closed_at: DateTime<Utc> },

    // =================================================================
    // Transfer Errors (5xx)
    // =================================================================
    /// The value ledger adapter reported failure on a push or pull.
    #[error("ES_ERR_500: value transfer failed")]
    TransferFailed,

    // =================================================================
    // Guard Errors (6xx)
    // =================================================================
    /// A mutating entry point was re-entered while another call was in flight.
    #[error("ES_ERR_600: reentrant call rejected")]
    ReentrantCall,

    // =================================================================
    // General / Configuration (9xx)
    // =================================================================
    /// Configuration error (zero windows, non-positive amount cap, etc.).
    #[error("ES_ERR_900: configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowError>;
