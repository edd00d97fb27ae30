//! Query surface — pure, side-effect-free reads.
//!
//! Everything here is safe to expose to dashboards, API gateways, and
//! keeper bots polling for work.

use openescrow_types::{AccountId, Escrow, EscrowBatchView, EscrowConfig, EscrowId};
use rust_decimal::Decimal;

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Full record snapshot.
    #[must_use]
    pub fn get_escrow(&self, id: EscrowId) -> Option<&Escrow> {
        self.registry.get(id)
    }

    /// True iff the record is ACTIVE and the deadline plus inspection
    /// period has passed — i.e. [`auto_release`](Self::auto_release) would
    /// pass its state and time checks right now.
    #[must_use]
    pub fn can_auto_release(&self, id: EscrowId) -> bool {
        self.registry.get(id).is_some_and(|record| {
            record.is_active()
                && self.clock.now() >= record.auto_release_at(self.config.inspection_period())
        })
    }

    /// Parallel state/amount vectors for bulk monitoring. Unknown ids read
    /// as `None` state and zero amount.
    #[must_use]
    pub fn get_escrow_batch(&self, ids: &[EscrowId]) -> EscrowBatchView {
        let mut states = Vec::with_capacity(ids.len());
        let mut amounts = Vec::with_capacity(ids.len());
        for &id in ids {
            match self.registry.get(id) {
                Some(record) => {
                    states.push(Some(record.state));
                    amounts.push(record.amount);
                }
                None => {
                    states.push(None);
                    amounts.push(Decimal::ZERO);
                }
            }
        }
        EscrowBatchView { states, amounts }
    }

    /// Number of records ever created.
    #[must_use]
    pub fn escrow_count(&self) -> usize {
        self.registry.count()
    }

    /// Number of records still custodying funds.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    /// The current arbitrator.
    #[must_use]
    pub fn arbitrator(&self) -> AccountId {
        self.arbitrator
    }

    /// The custody identity funds are pulled into and pushed out of.
    #[must_use]
    pub fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// The engine's policy configuration.
    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use openescrow_types::{Clock, EscrowState};

    use super::*;
    use crate::engine::testkit::{amount, fixture};

    #[test]
    fn snapshot_has_no_side_effects() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();

        let before = f.engine.get_escrow(id).unwrap().clone();
        let again = f.engine.get_escrow(id).unwrap();
        assert_eq!(before.state, again.state);
        assert_eq!(before.amount, again.amount);
        assert!(f.engine.get_escrow(EscrowId(5)).is_none());
    }

    #[test]
    fn can_auto_release_tracks_state_and_time() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();
        let opens_at = deadline + f.engine.config().inspection_period();

        assert!(!f.engine.can_auto_release(id));
        f.clock.set(opens_at - Duration::seconds(1));
        assert!(!f.engine.can_auto_release(id));
        f.clock.set(opens_at);
        assert!(f.engine.can_auto_release(id));

        // Unknown ids are simply not eligible.
        assert!(!f.engine.can_auto_release(EscrowId(42)));

        // A disputed record is never eligible, regardless of time.
        f.engine.dispute(f.funder, id).unwrap();
        assert!(!f.engine.can_auto_release(id));
    }

    #[test]
    fn batch_view_is_parallel_and_total() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let a = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();
        let b = f
            .engine
            .create(
                &mut f.ledger,
                f.funder,
                f.beneficiary,
                Decimal::new(42, 0),
                deadline,
            )
            .unwrap();
        f.engine.release(&mut f.ledger, f.funder, b).unwrap();

        let view = f.engine.get_escrow_batch(&[a, b, EscrowId(77)]);
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.states,
            vec![
                Some(EscrowState::Active),
                Some(EscrowState::Released),
                None
            ]
        );
        assert_eq!(
            view.amounts,
            vec![amount(), Decimal::new(42, 0), Decimal::ZERO]
        );
    }

    #[test]
    fn counters_track_lifecycle() {
        let mut f = fixture();
        let deadline = f.clock.now() + Duration::days(1);
        let id = f
            .engine
            .create(&mut f.ledger, f.funder, f.beneficiary, amount(), deadline)
            .unwrap();
        assert_eq!(f.engine.escrow_count(), 1);
        assert_eq!(f.engine.active_count(), 1);

        f.engine.release(&mut f.ledger, f.funder, id).unwrap();
        assert_eq!(f.engine.escrow_count(), 1);
        assert_eq!(f.engine.active_count(), 0);
    }
}
