//! Batch orchestration — per-item independent success over the single-item
//! release operations.
//!
//! One unreleasable record (already disputed, already terminal, wrong
//! caller) must never block the rest of a keeper's batch: each item applies
//! the full single-item checks, failures are recorded in the result vector,
//! and the loop continues. A failed outbound transfer inside an item rolls
//! that record back to ACTIVE before the item is marked failed.

use openescrow_ledger::ValueLedger;
use openescrow_types::{AccountId, EscrowId, Result};

use crate::engine::EscrowEngine;

impl EscrowEngine {
    /// Funder-batch release: apply [`release`](Self::release) checks to each
    /// id, skipping failures. Returns a success flag per input position.
    ///
    /// # Errors
    /// Only `ReentrantCall`; per-item errors are captured in the flags.
    pub fn release_batch(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        ids: &[EscrowId],
    ) -> Result<Vec<bool>> {
        self.begin()?;
        let mut flags = Vec::with_capacity(ids.len());
        for &id in ids {
            let outcome = self.release_inner(ledger, caller, id);
            if let Err(err) = &outcome {
                tracing::debug!(%id, %err, "batch release item skipped");
            }
            flags.push(outcome.is_ok());
        }
        self.finish();
        Ok(flags)
    }

    /// Keeper-batch auto-release: apply [`auto_release`](Self::auto_release)
    /// checks to each id, skipping failures.
    ///
    /// # Errors
    /// Only `ReentrantCall`; per-item errors are captured in the flags.
    pub fn auto_release_batch(
        &mut self,
        ledger: &mut dyn ValueLedger,
        caller: AccountId,
        ids: &[EscrowId],
    ) -> Result<Vec<bool>> {
        self.begin()?;
        let mut flags = Vec::with_capacity(ids.len());
        for &id in ids {
            let outcome = self.auto_release_inner(ledger, caller, id);
            if let Err(err) = &outcome {
                tracing::debug!(%id, %err, "batch auto-release item skipped");
            }
            flags.push(outcome.is_ok());
        }
        self.finish();
        Ok(flags)
    }
}
