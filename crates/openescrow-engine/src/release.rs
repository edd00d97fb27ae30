//! Release engine — manual release and time-gated auto-release.
//!
//! `release` is funder-only; `auto_release` is deliberately permissionless
//! so keeper bots can earn by triggering timely releases once the deadline
//! plus the inspection buffer has passed. Both funnel through the shared
//! payout path: state advances first, the push follows, and a failed push
//! rolls the record back to ACTIVE.

use openescrow_ledger::ValueLedger;
use openescrow_types::{AccountId, EscrowError, EscrowEvent, EscrowId, EscrowState, Result};

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Release a record to its beneficiary. Funder only; record must be
    /// ACTIVE.
    ///
    /// # Errors
    /// `EscrowNotFound`, `Unauthorized`, `InvalidState`, or
    /// `TransferFailed` (state fully rolled back).
    pub fn release(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        self.begin()?;
        let out = self.release_inner(ledger, caller, id);
        self.finish();
        out
    }

    /// Release a record whose deadline plus inspection period has passed.
    /// Callable by **any** identity.
    ///
    /// # Errors
    /// `EscrowNotFound`, `InvalidState`, `DeadlineNotReached`, or
    /// `TransferFailed` (state fully rolled back).
    pub fn auto_release(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        self.begin()?;
        let out = self.auto_release_inner(ledger, caller, id);
        self.finish();
        out
    }

    pub(crate) fn release_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        let record = self.registry.fetch(id)?;
        if caller != record.funder {
            return Err(EscrowError::Unauthorized);
        }
        let (beneficiary, amount) = (record.beneficiary, record.amount);

        self.pay_out(ledger, id, EscrowState::Released, beneficiary)?;
        self.emit(EscrowEvent::Released {
            id,
            releaser: caller,
            amount,
        });
        Ok(())
    }

    pub(crate) fn auto_release_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
    ) -> Result<()> {
        let now = self.clock.now();
        let record = self.registry.fetch(id)?;
        if !record.is_active() {
            return Err(EscrowError::InvalidState {
                from: record.state,
                to: EscrowState::Released,
            });
        }
        let opens_at = record.auto_release_at(self.config.inspection_period());
        if now < opens_at {
            return Err(EscrowError::DeadlineNotReached { opens_at });
        }
        let (beneficiary, amount) = (record.beneficiary, record.amount);

        self.pay_out(ledger, id, EscrowState::Released, beneficiary)?;
        self.emit(EscrowEvent::Released {
            id,
            releaser: caller,
            amount,
        });
        Ok(())
    }
}
