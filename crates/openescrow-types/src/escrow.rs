//! # Escrow record — the custody primitive
//!
//! An [`Escrow`] holds a funder's value on behalf of a beneficiary until a
//! release condition is satisfied. Funds never move directly between the
//! counterparties; the engine's custody account is the holder of record.
//!
//! ## State Machine
//!
//! ```text
//!               release / auto-release
//!   ┌────────┐ ──────────────────────▶ ┌──────────┐
//!   │ ACTIVE │                         │ RELEASED │◀─┐
//!   └─┬────┬─┘                         └──────────┘  │ resolve(refund=false)
//!     │    │ cancel (within window)                  │
//!     │    ▼                                         │
//!     │  ┌───────────┐          ┌──────────┐   ┌─────┴────┐
//!     │  │ CANCELLED │          │ REFUNDED │◀──│ DISPUTED │
//!     │  └───────────┘          └──────────┘   └──────────┘
//!     │                      resolve(refund=true)    ▲
//!     └──────────────────────────────────────────────┘
//!                      dispute (funder or beneficiary)
//! ```
//!
//! Transitions are **monotonic**: a record never re-enters ACTIVE after
//! leaving it, and RELEASED / REFUNDED / CANCELLED are terminal. The one
//! internal exception is [`Escrow::rollback_to_active`], the escape hatch
//! for a failed outbound transfer after a tentative transition.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, EscrowError, EscrowId, Result};

/// The lifecycle state of an escrow record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowState {
    /// Funds are custodied. All transitions start here.
    Active,
    /// Funds were paid to the beneficiary. Terminal.
    Released,
    /// A counterparty escalated. No fund movement; only the arbitrator
    /// can resolve.
    Disputed,
    /// The arbitrator returned the funds to the funder. Terminal.
    Refunded,
    /// The funder exited within the cancellation window; funds returned.
    /// Terminal.
    Cancelled,
}

impl EscrowState {
    /// Can this record transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Active,
                Self::Released | Self::Cancelled | Self::Disputed
            ) | (Self::Disputed, Self::Released | Self::Refunded)
        )
    }

    /// Whether this state admits no further transitions.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded | Self::Cancelled)
    }
}

impl std::fmt::Display for EscrowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Released => write!(f, "RELEASED"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Refunded => write!(f, "REFUNDED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// An escrow record: value custodied on behalf of two counterparties.
///
/// `funder`, `beneficiary`, `amount`, `created_at`, and `deadline` are
/// immutable after creation; only `state` changes, and only along the
/// transition graph above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    /// Dense registry-allocated identifier.
    pub id: EscrowId,
    /// The party that deposited the value.
    pub funder: AccountId,
    /// The intended recipient.
    pub beneficiary: AccountId,
    /// The custodied amount.
    pub amount: Decimal,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// After this instant (plus the inspection period), anyone may trigger
    /// release.
    pub deadline: DateTime<Utc>,
    /// Current lifecycle state.
    pub state: EscrowState,
}

impl Escrow {
    /// Returns `true` if this record is still custodying funds.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == EscrowState::Active
    }

    /// The instant at which permissionless auto-release opens.
    #[must_use]
    pub fn auto_release_at(&self, inspection_period: Duration) -> DateTime<Utc> {
        self.deadline + inspection_period
    }

    /// The last instant at which the funder may still cancel.
    #[must_use]
    pub fn cancel_deadline(&self, cancellation_window: Duration) -> DateTime<Utc> {
        self.created_at + cancellation_window
    }

    /// Attempt a transition to `target`, enforcing the monotonic graph.
    ///
    /// # Errors
    /// Returns [`EscrowError::InvalidState`] if the transition is not legal
    /// from the current state.
    pub fn transition(&mut self, target: EscrowState) -> Result<()> {
        if !self.state.can_transition_to(target) {
            return Err(EscrowError::InvalidState {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        Ok(())
    }

    /// Roll a tentatively advanced record back to ACTIVE.
    ///
    /// This is **not** part of the transition graph. It exists solely so a
    /// failed outbound transfer can undo the advance-state-before-transfer
    /// ordering without leaving the record stuck in a paid state that was
    /// never actually paid. Callers must only invoke it on the record they
    /// just advanced, before the operation returns.
    pub fn rollback_to_active(&mut self) {
        self.state = EscrowState::Active;
    }
}

/// Dummy record for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Escrow {
    /// Create a dummy ACTIVE record for unit tests.
    #[must_use]
    pub fn dummy(funder: AccountId, beneficiary: AccountId, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: EscrowId(0),
            funder,
            beneficiary,
            amount,
            created_at: now,
            deadline: now + Duration::days(1),
            state: EscrowState::Active,
        }
    }
}
