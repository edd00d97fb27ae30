//! In-memory reference ledger.
//!
//! Tracks per-account balances plus the allowance each owner has granted to
//! the custody account. All mutations are atomic: either the full transfer
//! succeeds or nothing changes.

use std::collections::HashMap;

use openescrow_types::AccountId;
use rust_decimal::Decimal;

use crate::ValueLedger;

/// A single-asset balance table with custody-account allowances.
///
/// The custody engine is the only spender, so allowances are keyed by owner
/// alone: `approve` grants the custody account the right to pull up to the
/// approved amount.
pub struct InMemoryLedger {
    /// The engine's custody identity; `transfer` debits this account.
    custody: AccountId,
    /// Per-account balances.
    balances: HashMap<AccountId, Decimal>,
    /// Per-owner allowance granted to the custody account.
    allowances: HashMap<AccountId, Decimal>,
}

impl InMemoryLedger {
    /// Create an empty ledger whose pushes debit `custody`.
    #[must_use]
    pub fn new(custody: AccountId) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Credit new value to an account (increases total supply).
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_default() += amount;
    }

    /// Grant the custody account the right to pull up to `amount` from
    /// `owner`. Replaces any prior allowance.
    pub fn approve(&mut self, owner: AccountId, amount: Decimal) {
        self.allowances.insert(owner, amount);
    }

    /// Current balance of an account.
    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Decimal {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Remaining allowance the owner has granted to the custody account.
    #[must_use]
    pub fn allowance_of(&self, owner: AccountId) -> Decimal {
        self.allowances.get(&owner).copied().unwrap_or_default()
    }

    /// Sum of all balances. Transfers conserve this; only `mint` raises it.
    #[must_use]
    pub fn total_supply(&self) -> Decimal {
        self.balances.values().copied().sum()
    }

    /// The custody account pushes are debited from.
    #[must_use]
    pub fn custody(&self) -> AccountId {
        self.custody
    }
}

impl ValueLedger for InMemoryLedger {
    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        let balance = self.balance_of(from);
        let allowance = self.allowance_of(from);
        if balance < amount || allowance < amount {
            return false;
        }
        *self.balances.entry(from).or_default() -= amount;
        *self.allowances.entry(from).or_default() -= amount;
        *self.balances.entry(to).or_default() += amount;
        true
    }

    fn transfer(&mut self, to: AccountId, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        if self.balance_of(self.custody) < amount {
            return false;
        }
        *self.balances.entry(self.custody).or_default() -= amount;
        *self.balances.entry(to).or_default() += amount;
        true
    }
}
