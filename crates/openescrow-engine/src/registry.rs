//! Escrow registry — the single source of truth for record existence.
//!
//! Records live in a `Vec` indexed by their id, so the identifier invariant
//! (dense, strictly increasing from zero, never reused) holds by
//! construction: the next id is always the current length, and records are
//! never removed — terminal records persist for audit and query.

use chrono::{DateTime, Utc};
use openescrow_types::{AccountId, Escrow, EscrowError, EscrowId, EscrowState, Result};
use rust_decimal::Decimal;

/// Owns the record table and allocates identifiers.
#[derive(Debug, Default)]
pub struct EscrowRegistry {
    records: Vec<Escrow>,
}

impl EscrowRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The id the next successful creation will receive.
    #[must_use]
    pub fn next_id(&self) -> EscrowId {
        EscrowId(self.records.len() as u64)
    }

    /// Allocate the next id and store a new ACTIVE record.
    ///
    /// Callers must have completed validation and the inbound pull first; a
    /// record that reaches the registry is live custody.
    pub fn insert(
        &mut self,
        funder: AccountId,
        beneficiary: AccountId,
        amount: Decimal,
        created_at: DateTime<Utc>,
        deadline: DateTime<Utc>,
    ) -> EscrowId {
        let id = self.next_id();
        self.records.push(Escrow {
            id,
            funder,
            beneficiary,
            amount,
            created_at,
            deadline,
            state: EscrowState::Active,
        });
        id
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: EscrowId) -> Option<&Escrow> {
        self.records.get(id.index())
    }

    /// Mutable lookup for the transition modules.
    pub fn get_mut(&mut self, id: EscrowId) -> Option<&mut Escrow> {
        self.records.get_mut(id.index())
    }

    /// Like [`get`](Self::get) but surfaces `EscrowNotFound`.
    pub fn fetch(&self, id: EscrowId) -> Result<&Escrow> {
        self.get(id).ok_or(EscrowError::EscrowNotFound(id))
    }

    /// Like [`get_mut`](Self::get_mut) but surfaces `EscrowNotFound`.
    pub fn fetch_mut(&mut self, id: EscrowId) -> Result<&mut Escrow> {
        self.records
            .get_mut(id.index())
            .ok_or(EscrowError::EscrowNotFound(id))
    }

    /// Number of records ever created.
    #[must_use]
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Whether no record has ever been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records still custodying funds.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }

    /// Iterate over every record, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Escrow> {
        self.records.iter()
    }
}
