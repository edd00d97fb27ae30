//! Cancellation — the funder's bounded early exit.
//!
//! The window is bounded so the funder cannot renege after the counterparty
//! has begun work, while mistakes made at creation can still be corrected.
//! Inside the window the funds go straight back to the funder.

use openescrow_ledger::ValueLedger;
use openescrow_types::{AccountId, EscrowError, EscrowEvent, EscrowId, EscrowState, Result};

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Cancel a record and return the funds to the funder. Funder only;
    /// record must be ACTIVE and within the cancellation window.
    ///
    /// # Errors
    /// `EscrowNotFound`, `Unauthorized`, `InvalidState`,
    /// `CancellationWindowExpired`, or `TransferFailed` (state fully rolled
    /// back).
    pub fn cancel(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        self.begin()?;
        let out = self.cancel_inner(ledger, caller, id);
        self.finish();
        out
    }

    pub(crate) fn cancel_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        let now = self.clock.now();
        let record = self.registry.fetch(id)?;
        if caller != record.funder {
            return Err(EscrowError::Unauthorized);
        }
        if !record.is_active() {
            return Err(EscrowError::InvalidState {
                from: record.state,
                to: EscrowState::Cancelled,
            });
        }
        let closed_at = record.cancel_deadline(self.config.cancellation_window());
        if now > closed_at {
            return Err(EscrowError::CancellationWindowExpired { closed_at });
        }
        let funder = record.funder;

        self.pay_out(ledger, id, EscrowState::Cancelled, funder)?;
        self.emit(EscrowEvent::Cancelled {
            id,
            canceller: caller,
        });
        Ok(())
    }
}
