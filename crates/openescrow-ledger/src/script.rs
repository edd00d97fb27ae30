//! Scripted ledger for tests. **Never use in production.**
//!
//! Records every pull and push the engine attempts and answers each call
//! from a programmable result script, so tests can force a transfer failure
//! at an exact point and then assert what the engine did about it.

use std::collections::VecDeque;

use openescrow_types::AccountId;
use rust_decimal::Decimal;

use crate::ValueLedger;

/// A recording ledger with scripted per-call results.
///
/// Calls consume results from the front of the script; once the script is
/// exhausted every call returns `default_result`.
pub struct ScriptedLedger {
    script: VecDeque<bool>,
    default_result: bool,
    /// Every `transfer_from` attempted: (from, to, amount).
    pub pulls: Vec<(AccountId, AccountId, Decimal)>,
    /// Every `transfer` attempted: (to, amount).
    pub pushes: Vec<(AccountId, Decimal)>,
}

impl ScriptedLedger {
    /// A ledger that accepts every transfer.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            script: VecDeque::new(),
            default_result: true,
            pulls: Vec::new(),
            pushes: Vec::new(),
        }
    }

    /// A ledger that rejects every transfer.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            default_result: false,
            ..Self::accepting()
        }
    }

    /// Queue an explicit result for the next unanswered call.
    pub fn enqueue(&mut self, result: bool) {
        self.script.push_back(result);
    }

    /// Total value pulled in (successfully or not — this is what the engine
    /// *asked for*; pair with the script to reason about what succeeded).
    #[must_use]
    pub fn pulled_total(&self) -> Decimal {
        self.pulls.iter().map(|(_, _, amount)| *amount).sum()
    }

    /// Pushes attempted to a specific account.
    #[must_use]
    pub fn pushes_to(&self, account: AccountId) -> Vec<Decimal> {
        self.pushes
            .iter()
            .filter(|(to, _)| *to == account)
            .map(|(_, amount)| *amount)
            .collect()
    }

    fn next_result(&mut self) -> bool {
        self.script.pop_front().unwrap_or(self.default_result)
    }
}

impl ValueLedger for ScriptedLedger {
    fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Decimal) -> bool {
        self.pulls.push((from, to, amount));
        self.next_result()
    }

    fn transfer(&mut self, to: AccountId, amount: Decimal) -> bool {
        self.pushes.push((to, amount));
        self.next_result()
    }
}
