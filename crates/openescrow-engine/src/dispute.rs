//! Dispute escalation and arbitrator-exclusive resolution.
//!
//! `dispute` is a pure flag flip — no value moves. Once a record is
//! DISPUTED every normal release and cancel path is blocked by the state
//! machine; only the arbitrator decides where the funds go, and the
//! arbitrator role itself can only be reassigned by its current holder.

use openescrow_ledger::ValueLedger;
use openescrow_types::{AccountId, EscrowError, EscrowEvent, EscrowId, EscrowState, Result};

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Escalate an ACTIVE record to DISPUTED. Funder or beneficiary only.
    /// No fund movement.
    ///
    /// # Errors
    /// `EscrowNotFound`, `Unauthorized`, or `InvalidState`.
    pub fn dispute(&mut self, caller: AccountId, id: EscrowId) -> Result<()> {
        self.begin()?;
        let out = self.dispute_inner(caller, id);
        self.finish();
        out
    }

    /// Resolve a DISPUTED record. Arbitrator only: `refund` pays the funder
    /// back (REFUNDED), otherwise the beneficiary is paid (RELEASED).
    ///
    /// # Errors
    /// `EscrowNotFound`, `Unauthorized`, `InvalidState`, or
    /// `TransferFailed` (the record stays DISPUTED and resolvable).
    pub fn resolve_dispute(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
        refund: bool,
    ) -> Result<()> {
        self.begin()?;
        let out = self.resolve_dispute_inner(ledger, caller, id, refund);
        self.finish();
        out
    }

    /// Reassign the process-wide arbitrator. Current arbitrator only; the
    /// null identity is never a valid arbitrator.
    ///
    /// # Errors
    /// `Unauthorized` or `InvalidArbitrator`.
    pub fn set_arbitrator(&mut self, caller: AccountId, new: AccountId) -> Result<()> {
        self.begin()?;
        let out = self.set_arbitrator_inner(caller, new);
        self.finish();
        out
    }

    fn dispute_inner(&mut self, caller: AccountId, id: EscrowId) -> Result<()> {
        let record = self.registry.fetch_mut(id)?;
        if caller != record.funder && caller != record.beneficiary {
            return Err(EscrowError::Unauthorized);
        }
        record.transition(EscrowState::Disputed)?;

        self.emit(EscrowEvent::DisputeRaised {
            id,
            disputer: caller,
        });
        Ok(())
    }

    fn resolve_dispute_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        id: EscrowId,
        refund: bool,
    ) -> Result<()> {
        if caller != self.arbitrator {
            return Err(EscrowError::Unauthorized);
        }
        let record = self.registry.fetch(id)?;
        if record.state != EscrowState::Disputed {
            return Err(EscrowError::InvalidState {
                from: record.state,
                to: if refund {
                    EscrowState::Refunded
                } else {
                    EscrowState::Released
                },
            });
        }
        let (target, recipient) = if refund {
            (EscrowState::Refunded, record.funder)
        } else {
            (EscrowState::Released, record.beneficiary)
        };

        self.pay_out_disputed(ledger, id, target, recipient)?;
        self.emit(EscrowEvent::DisputeResolved {
            id,
            arbitrator: caller,
            refunded: refund,
        });
        Ok(())
    }

    /// Payout variant for disputed records: a failed push restores DISPUTED
    /// (not ACTIVE), so the record stays locked for the arbitrator.
    fn pay_out_disputed(
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
            tracing::warn!(%id, %recipient, %amount, "resolution transfer failed, rolling back");
            if let Some(record) = self.registry.get_mut(id) {
                record.state = EscrowState::Disputed;
            }
            return Err(EscrowError::TransferFailed);
        }
        Ok(())
    }

    fn set_arbitrator_inner(&mut self, caller: AccountId, new: AccountId) -> Result<()> {
        if caller != self.arbitrator {
            return Err(EscrowError::Unauthorized);
        }
        if new.is_nil() {
            return Err(EscrowError::InvalidArbitrator);
        }
        let old = self.arbitrator;
        self.arbitrator = new;
        self.emit(EscrowEvent::ArbitratorChanged { old, new });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use openescrow_ledger::ScriptedLedger;
    use openescrow_types::Clock;
    use rust_decimal::Decimal;

    use super::*;
    use crate::engine::testkit::{Fixture, amount, fixture};

    fn disputed_fixture() -> (Fixture, EscrowId) {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();
        f.engine.dispute(f.beneficiary, id).unwrap();
        (f, id)
    }

    #[test]
    fn either_party_can_dispute() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        for disputer in [f.funder, f.beneficiary] {
            let id = f
                .engine
                .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
                .unwrap();
            f.engine.dispute(disputer, id).unwrap();
            assert_eq!(f.engine.get_escrow(id).unwrap().state, EscrowState::Disputed);
        }
    }

    #[test]
    fn stranger_cannot_dispute() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();
        let err = f.engine.dispute(AccountId::new(), id).unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized));
    }

    #[test]
    fn dispute_moves_no_funds() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let mut ledger = ScriptedLedger::accepting();
        let id = f
            .engine
            .create(&mut ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();

        f.engine.dispute(f.funder, id).unwrap();
        assert!(ledger.pushes.is_empty());
    }

    #[test]
    fn resolve_with_refund_pays_funder() {
        let (mut f, id) = disputed_fixture();
        let funder_before = f.ledger.balance_of(f.funder);

        f.engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, true)
            .unwrap();

        assert_eq!(f.engine.get_escrow(id).unwrap().state, EscrowState::Refunded);
        assert_eq!(f.ledger.balance_of(f.funder), funder_before + amount());
        assert_eq!(f.ledger.balance_of(f.beneficiary), Decimal::ZERO);
    }

    #[test]
    fn resolve_without_refund_pays_beneficiary() {
        let (mut f, id) = disputed_fixture();

        f.engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, false)
            .unwrap();

        assert_eq!(f.engine.get_escrow(id).unwrap().state, EscrowState::Released);
        assert_eq!(f.ledger.balance_of(f.beneficiary), amount());
    }

    #[test]
    fn only_arbitrator_resolves() {
        let (mut f, id) = disputed_fixture();
        for caller in [f.funder, f.beneficiary, AccountId::new()] {
            let err = f
                .engine
                .resolve_dispute(&mut f.ledger, caller, id, true)
                .unwrap_err();
            assert!(matches!(err, EscrowError::Unauthorized));
        }
        assert_eq!(f.engine.get_escrow(id).unwrap().state, EscrowState::Disputed);
    }

    #[test]
    fn resolve_requires_disputed_state() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();

        let err = f
            .engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, true)
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::InvalidState {
                from: EscrowState::Active,
                to: EscrowState::Refunded,
            }
        ));
    }

    #[test]
    fn failed_resolution_push_keeps_record_disputed() {
        let (mut f, id) = disputed_fixture();
        let mut broke = ScriptedLedger::rejecting();

        let err = f
            .engine
            .resolve_dispute(&mut broke, f.arbitrator, id, false)
            .unwrap_err();
        assert!(matches!(err, EscrowError::TransferFailed));
        assert_eq!(f.engine.get_escrow(id).unwrap().state, EscrowState::Disputed);

        // Still resolvable once the ledger cooperates.
        f.engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, false)
            .unwrap();
    }

    #[test]
    fn resolution_event_carries_outcome() {
        let (mut f, id) = disputed_fixture();
        f.engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, true)
            .unwrap();
        let events = f.engine.drain_events();
        assert!(matches!(
            events.last(),
            Some(EscrowEvent::DisputeResolved { refunded: true, .. })
        ));
    }

    #[test]
    fn arbitrator_handover() {
        let mut f = fixture();
        let successor = AccountId::new();

        // Only the incumbent may reassign.
        let err = f
            .engine
            .set_arbitrator(AccountId::new(), successor)
            .unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized));

        f.engine.set_arbitrator(f.arbitrator, successor).unwrap();
        assert_eq!(f.engine.arbitrator(), successor);

        // The old arbitrator is now powerless.
        let err = f
            .engine
            .set_arbitrator(f.arbitrator, AccountId::new())
            .unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized));
    }

    #[test]
    fn nil_arbitrator_rejected() {
        let mut f = fixture();
        let err = f
            .engine
            .set_arbitrator(f.arbitrator, AccountId::nil())
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidArbitrator));
    }

    #[test]
    fn new_arbitrator_can_resolve() {
        let (mut f, id) = disputed_fixture();
        let successor = AccountId::new();
        f.engine.set_arbitrator(f.arbitrator, successor).unwrap();

        let err = f
            .engine
            .resolve_dispute(&mut f.ledger, f.arbitrator, id, true)
            .unwrap_err();
        assert!(matches!(err, EscrowError::Unauthorized));
        f.engine
            .resolve_dispute(&mut f.ledger, successor, id, true)
            .unwrap();
    }
}
