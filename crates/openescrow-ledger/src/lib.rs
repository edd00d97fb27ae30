//! # openescrow-ledger
//!
//! The **Value Ledger Adapter** boundary: the trait through which the custody
//! engine moves fungible value, plus an in-memory reference implementation
//! and scripted test doubles.
//!
//! The engine never holds balances itself — it instructs the ledger to pull
//! funds into its custody account at creation and to push them out exactly
//! once at the terminal transition. The adapter must be treated as fallible
//! and potentially reentrant: the engine advances record state *before*
//! calling into it.

use openescrow_types::AccountId;
use rust_decimal::Decimal;

pub mod memory;
#[cfg(any(test, feature = "test-helpers"))]
pub mod script;

pub use memory::InMemoryLedger;
#[cfg(any(test, feature = "test-helpers"))]
pub use script::ScriptedLedger;

/// The fungible-value ledger consumed by the custody engine.
///
/// Both methods report success as `bool` rather than a typed error: the
/// adapter is an external collaborator and the engine maps any `false` to
/// its own `TransferFailed`.
pub trait ValueLedger {
    /// Pull `amount` from `from` into `to` (requires the holder's prior
    /// authorization, however the backing ledger models it).
    ///
    /// Returns `false` on insufficient balance or allowance.
    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> bool;

    /// Push `amount` from the caller's custody account to `to`.
    ///
    /// Returns `false` if the custody account lacks the balance.
    fn transfer(&mut self, to: AccountId, amount: Decimal) -> bool;
}
