//! # openescrow-engine
//!
//! The custody engine: holds third-party funds on behalf of two
//! counterparties until a release condition is satisfied, and arbitrates
//! disputes when they disagree.
//!
//! ## Architecture
//!
//! One [`EscrowEngine`] value owns all authoritative state — the record
//! table, the arbitrator identity, and the (implicit) next-id counter — and
//! every mutating operation runs as one atomic, sequential unit:
//!
//! 1. **Registry** ([`EscrowRegistry`]): record storage, dense id allocation
//! 2. **Creation**: validate → pull funds → allocate record
//! 3. **Release**: manual (funder) and time-gated permissionless auto-release
//! 4. **Cancellation**: funder early exit within a bounded window
//! 5. **Dispute & arbitration**: escalation flag and arbitrator-only resolution
//! 6. **Batch orchestration**: per-item independent success over the same ops
//! 7. **Query surface**: pure reads for dashboards and keeper bots
//!
//! ## Value Flow
//!
//! ```text
//! create  → ValueLedger::transfer_from(funder → custody)
//! release → ValueLedger::transfer(custody → beneficiary)
//! cancel / refund → ValueLedger::transfer(custody → funder)
//! ```
//!
//! State is advanced **before** the adapter is invoked, and a call-scoped
//! guard rejects reentrant entry, so custodied value leaves exactly once.

pub mod batch;
pub mod cancel;
pub mod create;
pub mod dispute;
pub mod engine;
pub mod query;
pub mod registry;
pub mod release;

pub use engine::EscrowEngine;
pub use registry::EscrowRegistry;
