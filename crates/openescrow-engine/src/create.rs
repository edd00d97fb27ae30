//! Escrow creation — validate, pull funds, allocate.
//!
//! The ordering is the whole contract: nothing is allocated until the
//! inbound pull has succeeded, so a failed pull leaves the registry and the
//! id counter untouched. Batch creation validates every item first, then
//! performs a **single aggregate pull** sized to the sum of the valid items
//! only, then allocates the valid records.

use chrono::{DateTime, Utc};
use openescrow_ledger::ValueLedger;
use openescrow_types::{
    AccountId, BatchCreateOutcome, EscrowError, EscrowEvent, EscrowId, EscrowSpec, Result,
};
use rust_decimal::Decimal;

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Create a single escrow, pulling `amount` from `funder` into custody.
    ///
    /// # Errors
    /// - `InvalidReceiver` for a nil beneficiary
    /// - `InvalidAmount` for a non-positive or over-cap amount
    /// - `InvalidDeadline` if the deadline is not in the future
    /// - `TransferFailed` if the pull fails (no record is allocated)
    pub fn create(
        &mut self,
        ledger: &mut dyn ValueLedger,
        funder: AccountId,
        beneficiary: AccountId,
        amount: Decimal,
        deadline: DateTime<Utc>,
    ) -> Result<EscrowId> {
        self.begin()?;
        let out = self.create_inner(ledger, funder, beneficiary, amount, deadline);
        self.finish();
        out
    }

    /// Create many escrows for one funder with a single aggregate pull.
    ///
    /// Items are validated independently; invalid items are skipped and
    /// reported as `None` in the outcome without aborting the batch. The
    /// aggregate pull covers the valid items only (validate-then-aggregate),
    /// so the pulled amount always matches the amounts actually escrowed.
    ///
    /// # Errors
    /// `TransferFailed` if the aggregate pull fails — that is a whole-call
    /// failure (an underfunded request), not a per-item condition.
    pub fn create_batch(
        &mut self,
        ledger: &mut dyn ValueLedger,
        funder: AccountId,
        specs: &[EscrowSpec],
    ) -> Result<BatchCreateOutcome> {
        self.begin()?;
        let out = self.create_batch_inner(ledger, funder, specs);
        self.finish();
        out
    }

    fn create_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        funder: AccountId,
        beneficiary: AccountId,
        amount: Decimal,
        deadline: DateTime<Utc>,
    ) -> Result<EscrowId> {
        let now = self.clock.now();
        self.validate_spec(now, beneficiary, amount, deadline)?;

        if !ledger.transfer_from(funder, self.custody, amount) {
            tracing::warn!(%funder, %amount, "inbound pull failed, no record allocated");
            return Err(EscrowError::TransferFailed);
        }

        let id = self
            .registry
            .insert(funder, beneficiary, amount, now, deadline);
        self.emit(EscrowEvent::Created {
            id,
            funder,
            beneficiary,
            amount,
            deadline,
        });
        Ok(id)
    }

    fn create_batch_inner(
        &mut self,
        ledger: &mut dyn ValueLedger,
        funder: AccountId,
        specs: &[EscrowSpec],
    ) -> Result<BatchCreateOutcome> {
        let now = self.clock.now();

        // Pass 1: validate every item, remembering which survived.
        let valid: Vec<bool> = specs
            .iter()
            .map(|spec| {
                self.validate_spec(now, spec.beneficiary, spec.amount, spec.deadline)
                    .is_ok()
            })
            .collect();

        // Pass 2: one pull for the summed valid amounts.
        let total: Decimal = specs
            .iter()
            .zip(&valid)
            .filter(|(_, ok)| **ok)
            .map(|(spec, _)| spec.amount)
            .sum();
        if total > Decimal::ZERO && !ledger.transfer_from(funder, self.custody, total) {
            tracing::warn!(%funder, %total, "aggregate pull failed, batch aborted");
            return Err(EscrowError::TransferFailed);
        }

        // Pass 3: allocate the valid records.
        let ids = specs
            .iter()
            .zip(&valid)
            .map(|(spec, ok)| {
                if !ok {
                    return None;
                }
                let id =
                    self.registry
                        .insert(funder, spec.beneficiary, spec.amount, now, spec.deadline);
                self.emit(EscrowEvent::Created {
                    id,
                    funder,
                    beneficiary: spec.beneficiary,
                    amount: spec.amount,
                    deadline: spec.deadline,
                });
                Some(id)
            })
            .collect();

        Ok(BatchCreateOutcome { ids })
    }

    fn validate_spec(
        &self,
        now: DateTime<Utc>,
        beneficiary: AccountId,
        amount: Decimal,
        deadline: DateTime<Utc>,
    ) -> Result<()> {
        if beneficiary.is_nil() {
            return Err(EscrowError::InvalidReceiver);
        }
        if amount <= Decimal::ZERO || amount > self.config.max_amount {
            return Err(EscrowError::InvalidAmount { amount });
        }
        if deadline <= now {
            return Err(EscrowError::InvalidDeadline);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use openescrow_ledger::ScriptedLedger;
    use openescrow_types::{Clock, EscrowState};

    use super::*;
    use crate::engine::testkit::{amount, fixture};

    #[test]
    fn create_allocates_active_record() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);

        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();

        assert_eq!(id, EscrowId(0));
        let record = f.engine.get_escrow(id).unwrap();
        assert_eq!(record.state, EscrowState::Active);
        assert_eq!(record.funder, f.funder);
        assert_eq!(record.beneficiary, f.beneficiary);
        assert_eq!(record.amount, amount());
        assert_eq!(record.deadline, deadline);
        assert!(record.deadline > record.created_at);
    }

    #[test]
    fn nil_beneficiary_rejected() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let err = f
            .engine
            .create(&mut f.ledger, f.funder, AccountId::nil(), amount(), deadline)
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidReceiver));
    }

    #[test]
    fn zero_and_over_cap_amounts_rejected() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);

        let err = f
            .engine
            .create(
                &mut f.ledger,
                f.funder,
                f.beneficiary,
                Decimal::ZERO,
                deadline,
            )
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidAmount { .. }));

        f.engine.config.max_amount = Decimal::new(100, 0);
        let err = f
            .engine
            .create(
                &mut f.ledger,
                f.funder,
                f.beneficiary,
                Decimal::new(101, 0),
                deadline,
            )
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidAmount { .. }));
    }

    #[test]
    fn past_deadline_rejected() {
        let mut f = fixture();
        let err = f
            .engine
            .create(
                &mut f.ledger,
                f.funder,
                f.beneficiary,
                amount(),
                f.clock.now(),
            )
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidDeadline));
    }

    #[test]
    fn failed_pull_allocates_nothing() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let next_before = f.engine.registry.next_id();

        let mut broke = ScriptedLedger::rejecting();
        let err = f
            .engine
            .create(&mut broke, f.funder, f.beneficiary, amount(), deadline)
            .unwrap_err();
        assert!(matches!(err, EscrowError::TransferFailed));

        // No record, counter unchanged, no event.
        assert_eq!(f.engine.escrow_count(), 0);
        assert_eq!(f.engine.registry.next_id(), next_before);
        assert!(f.engine.drain_events().is_empty());
    }

    #[test]
    fn batch_skips_invalid_items() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let specs = vec![
            EscrowSpec {
                beneficiary: f.beneficiary,
                amount: Decimal::new(100, 0),
                deadline,
            },
            // Invalid: nil receiver.
            EscrowSpec {
                beneficiary: AccountId::nil(),
                amount: Decimal::new(200, 0),
                deadline,
            },
            EscrowSpec {
                beneficiary: f.beneficiary,
                amount: Decimal::new(300, 0),
                deadline,
            },
        ];

        let outcome = f
            .engine
            .create_batch(&mut f.ledger, f.funder, &specs)
            .unwrap();
        assert_eq!(outcome.ok_flags(), vec![true, false, true]);
        assert_eq!(
            outcome.ids,
            vec![Some(EscrowId(0)), None, Some(EscrowId(1))]
        );
        assert_eq!(f.engine.escrow_count(), 2);
        assert_eq!(f.engine.drain_events().len(), 2);
    }

    #[test]
    fn batch_pull_covers_valid_items_only() {
        // Validate-then-aggregate: the one pull must equal the valid sum.
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let mut ledger = ScriptedLedger::accepting();
        let specs = vec![
            EscrowSpec {
                beneficiary: f.beneficiary,
                amount: Decimal::new(100, 0),
                deadline,
            },
            EscrowSpec {
                beneficiary: f.beneficiary,
                amount: Decimal::ZERO, // invalid
                deadline,
            },
            EscrowSpec {
                beneficiary: f.beneficiary,
                amount: Decimal::new(250, 0),
                deadline,
            },
        ];

        f.engine
            .create_batch(&mut ledger, f.funder, &specs)
            .unwrap();
        assert_eq!(ledger.pulls.len(), 1);
        assert_eq!(ledger.pulled_total(), Decimal::new(350, 0));
    }

    #[test]
    fn batch_with_no_valid_items_pulls_nothing() {
        let mut f = fixture();
        let mut ledger = ScriptedLedger::rejecting();
        let specs = vec![EscrowSpec {
            beneficiary: AccountId::nil(),
            amount: Decimal::new(100, 0),
            deadline: f.clock.now() + Duration::days(1),
        }];

        // Even a rejecting ledger is fine: a zero valid sum skips the pull.
        let outcome = f
            .engine
            .create_batch(&mut ledger, f.funder, &specs)
            .unwrap();
        assert_eq!(outcome.ids, vec![None]);
        assert!(ledger.pulls.is_empty());
    }

    #[test]
    fn failed_aggregate_pull_fails_whole_batch() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let mut broke = ScriptedLedger::rejecting();
        let specs = vec![EscrowSpec {
            beneficiary: f.beneficiary,
            amount: amount(),
            deadline,
        }];

        let err = f
            .engine
            .create_batch(&mut broke, f.funder, &specs)
            .unwrap_err();
        assert!(matches!(err, EscrowError::TransferFailed));
        assert_eq!(f.engine.escrow_count(), 0);
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut f = fixture();
        let outcome = f.engine.create_batch(&mut f.ledger, f.funder, &[]).unwrap();
        assert!(outcome.ids.is_empty());
        assert!(outcome.all_ok());
    }
}
