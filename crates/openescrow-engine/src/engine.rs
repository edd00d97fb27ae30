//! The custody engine value: authoritative state plus cross-cutting guards.
//!
//! All mutating entry points live in the sibling modules (`create`,
//! `release`, `cancel`, `dispute`, `batch`); this module owns the shared
//! state, the reentrancy guard, the event buffer, and the one payout path
//! every terminal transition funnels through.

use openescrow_ledger::ValueLedger;
use openescrow_types::{
    AccountId, Clock, EscrowConfig, EscrowError, EscrowEvent, EscrowId, EscrowState, Result,
    SystemClock,
};

use crate::registry::EscrowRegistry;

/// The escrow custody engine.
///
/// Owns the record table, the arbitrator identity, and the id allocation.
/// The value ledger is *not* owned: every operation that moves funds takes
/// it as an explicit `&mut dyn ValueLedger` collaborator, which keeps the
/// engine testable against scripted adapters.
pub struct EscrowEngine {
    pub(crate) registry: EscrowRegistry,
    pub(crate) config: EscrowConfig,
    /// The identity funds are pulled into and pushed out of.
    pub(crate) custody: AccountId,
    /// The single process-wide arbitrator.
    pub(crate) arbitrator: AccountId,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) events: Vec<EscrowEvent>,
    /// Call-scoped reentrancy flag; set across every mutating operation.
    entered: bool,
}

impl std::fmt::Debug for EscrowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("custody", &self.custody)
            .field("arbitrator", &self.arbitrator)
            .field("events", &self.events)
            .field("entered", &self.entered)
            .finish_non_exhaustive()
    }
}

impl EscrowEngine {
    /// Create an engine on the system clock.
    ///
    /// # Errors
    /// Returns `Configuration` for an invalid config or nil custody account,
    /// `InvalidArbitrator` for a nil arbitrator.
    pub fn new(config: EscrowConfig, custody: AccountId, arbitrator: AccountId) -> Result<Self> {
        Self::with_clock(config, custody, arbitrator, Box::new(SystemClock))
    }

    /// Create an engine with an injected clock (tests use a manual one).
    pub fn with_clock(
        config: EscrowConfig,
        custody: AccountId,
        arbitrator: AccountId,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        if custody.is_nil() {
            return Err(EscrowError::Configuration(
                "custody account must not be the null identity".into(),
            ));
        }
        if arbitrator.is_nil() {
            return Err(EscrowError::InvalidArbitrator);
        }
        Ok(Self {
            registry: EscrowRegistry::new(),
            config,
            custody,
            arbitrator,
            clock,
            events: Vec::new(),
            entered: false,
        })
    }

    /// Hand buffered notification events to the caller's indexer.
    pub fn drain_events(&mut self) -> Vec<EscrowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter a mutating operation. Fails if another call is in flight.
    pub(crate) fn begin(&mut self) -> Result<()> {
        if self.entered {
            return Err(EscrowError::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    /// Leave a mutating operation. Must pair with a successful [`begin`](Self::begin).
    pub(crate) fn finish(&mut self) {
        self.entered = false;
    }

    /// Record a notification and log it.
    pub(crate) fn emit(&mut self, event: EscrowEvent) {
        tracing::info!(event = %event, "escrow state change");
        self.events.push(event);
    }

    /// Advance a record into a paid state and push the funds out.
    ///
    /// The transition commits **before** the adapter is invoked, so any
    /// reentrant observer already sees the record out of ACTIVE. If the push
    /// fails the record is restored to ACTIVE and the call fails with
    /// `TransferFailed` — no fund loss, no stuck paid-but-unpaid state.
    pub(crate) fn pay_out(
        &mut self,
        ledger: &mut dyn ValueLedger,
        id: EscrowId,
        target: EscrowState,
        recipient: AccountId,
    ) -> Result<()> {
        let record = self.registry.fetch_mut(id)?;
        record.transition(target)?;
        let amount = record.amount;

        if !ledger.transfer(recipient, amount) {
            tracing::warn!(%id, %recipient, %amount, "outbound transfer failed, rolling back");
            if let Some(record) = self.registry.get_mut(id) {
                record.rollback_to_active();
            }
            return Err(EscrowError::TransferFailed);
        }
        Ok(())
    }
}
