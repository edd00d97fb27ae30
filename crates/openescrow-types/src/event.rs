//! Notification events emitted by the custody engine.
//!
//! Events are consumed by off-process indexers, dashboards, and keeper bots.
//! The engine buffers them per operation; callers drain the buffer and ship
//! the events wherever they need to go. Emission is not transactional with
//! external consumers — the authoritative state is always the record table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, EscrowId};

/// A notification of a state change in the custody engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowEvent {
    /// A new record was created and funds were pulled into custody.
    Created {
        id: EscrowId,
        funder: AccountId,
        beneficiary: AccountId,
        amount: Decimal,
        deadline: DateTime<Utc>,
    },
    /// Funds were paid to the beneficiary (manual, auto, or arbitrated).
    Released {
        id: EscrowId,
        releaser: AccountId,
        amount: Decimal,
    },
    /// A counterparty escalated the record to DISPUTED.
    DisputeRaised { id: EscrowId, disputer: AccountId },
    /// The arbitrator resolved a dispute.
    DisputeResolved {
        id: EscrowId,
        arbitrator: AccountId,
        refunded: bool,
    },
    /// The funder cancelled within the window; funds returned.
    Cancelled { id: EscrowId, canceller: AccountId },
    /// The arbitrator role was reassigned.
    ArbitratorChanged { old: AccountId, new: AccountId },
}

impl EscrowEvent {
    /// Stable label for log lines and indexer topic routing.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "ESCROW_CREATED",
            Self::Released { .. } => "ESCROW_RELEASED",
            Self::DisputeRaised { .. } => "DISPUTE_RAISED",
            Self::DisputeResolved { .. } => "DISPUTE_RESOLVED",
            Self::Cancelled { .. } => "ESCROW_CANCELLED",
            Self::ArbitratorChanged { .. } => "ARBITRATOR_CHANGED",
        }
    }

    /// The record this event concerns, if any.
    #[must_use]
    pub fn escrow_id(&self) -> Option<EscrowId> {
        match self {
            Self::Created { id, .. }
            | Self::Released { id, .. }
            | Self::DisputeRaised { id, .. }
            | Self::DisputeResolved { id, .. }
            | Self::Cancelled { id, .. } => Some(*id),
            Self::ArbitratorChanged { .. } => None,
        }
    }
}

impl std::fmt::Display for EscrowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.escrow_id() {
            Some(id) => write!(f, "{} {id}", self.label()),
            None => write!(f, "{}", self.label()),
        }
    }
}
