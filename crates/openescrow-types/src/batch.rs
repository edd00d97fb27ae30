//! Batch request and result carriers.
//!
//! Batch operations favor availability under partial failure: one bad item
//! never aborts the rest. The carriers here encode the per-position outcome
//! so callers can tell exactly which identifiers actually transitioned.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, EscrowId, EscrowState};

/// One requested escrow in a batch creation call.
///
/// Struct-shaped on purpose: the reference system's parallel-array encoding
/// could present mismatched lengths, which this API makes unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowSpec {
    pub beneficiary: AccountId,
    pub amount: Decimal,
    pub deadline: DateTime<Utc>,
}

/// Per-position result of a batch creation call.
///
/// `ids[i]` is `Some(id)` when item `i` validated and was created, `None`
/// when it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCreateOutcome {
    pub ids: Vec<Option<EscrowId>>,
}

impl BatchCreateOutcome {
    /// Success flag per input position.
    #[must_use]
    pub fn ok_flags(&self) -> Vec<bool> {
        self.ids.iter().map(Option::is_some).collect()
    }

    /// Number of records actually created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.ids.iter().filter(|id| id.is_some()).count()
    }

    /// Whether every item in the batch was created.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.ids.iter().all(Option::is_some)
    }
}

/// Parallel state/amount vectors for bulk monitoring reads.
///
/// `states[i]` is `None` (and `amounts[i]` zero) for identifiers that were
/// never allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowBatchView {
    pub states: Vec<Option<EscrowState>>,
    pub amounts: Vec<Decimal>,
}

impl EscrowBatchView {
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
