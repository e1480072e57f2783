//! # Ledger Store
//!
//! The bookkeeping heart of the Phoenix token: account balances, delegated
//! spending allowances, and the total-supply counter, with the arithmetic
//! primitives that mutate them.
//!
//! Every mutating primitive computes all of its new values *before* writing
//! any of them, so a failed operation leaves the store untouched. Monetary
//! arithmetic is checked -- an operation that would overflow or underflow
//! fails with a typed error instead of wrapping.
//!
//! Invariant maintained by every primitive here: the sum of all account
//! balances equals the total supply. `credit`/`debit`/`transfer` move value
//! between accounts without touching the supply; `mint_into`/`burn_from`
//! adjust both sides together.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::address::Address;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger bookkeeping operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Attempted to debit more than the account's recorded balance.
    #[error("insufficient balance: account {account} holds {balance}, requested {requested}")]
    InsufficientBalance {
        /// The account that was being debited.
        account: Address,
        /// The account's current balance.
        balance: u128,
        /// The amount that was requested.
        requested: u128,
    },

    /// A delegated spend exceeds the remaining allowance.
    #[error(
        "insufficient allowance: {spender} may spend {allowance} of {owner}'s balance, requested {requested}"
    )]
    InsufficientAllowance {
        /// The account whose balance would be spent.
        owner: Address,
        /// The delegate attempting the spend.
        spender: Address,
        /// The remaining approved amount.
        allowance: u128,
        /// The amount that was requested.
        requested: u128,
    },

    /// A credit would overflow the recipient's balance.
    #[error("balance overflow: account {account} holds {balance}, credit {credit}")]
    BalanceOverflow {
        /// The account that was being credited.
        account: Address,
        /// The balance before the failed credit.
        balance: u128,
        /// The amount that caused the overflow.
        credit: u128,
    },

    /// A mint would overflow the total-supply counter.
    #[error("supply overflow: total supply {supply}, credit {credit}")]
    SupplyOverflow {
        /// The supply before the failed mint.
        supply: u128,
        /// The amount that caused the overflow.
        credit: u128,
    },
}

// ---------------------------------------------------------------------------
// LedgerStore
// ---------------------------------------------------------------------------

/// Balances, allowances, and total supply for a single fungible asset.
///
/// Accounts are created implicitly on first credit and never explicitly
/// destroyed; a fully-spent account simply decays to a zero balance.
/// Allowances are keyed owner-then-spender. Ordered maps keep the
/// serialized state deterministic.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LedgerStore {
    /// Account balances in base units.
    balances: BTreeMap<Address, u128>,
    /// Delegated spending limits: owner -> spender -> amount.
    allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    /// Sum of all balances.
    total_supply: u128,
}

impl LedgerStore {
    /// Creates an empty store with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account`, or 0 if it has never been credited.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Returns the remaining amount `spender` may move out of `owner`'s
    /// balance, or 0 if no approval exists.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Sets `spender`'s allowance over `owner`'s balance to exactly `amount`,
    /// replacing any previous approval.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: u128) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    /// Credits `amount` to `account` without touching the supply.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] if the credit would exceed
    /// `u128::MAX`.
    pub fn credit(&mut self, account: Address, amount: u128) -> Result<u128, LedgerError> {
        let balance = self.balances.entry(account).or_insert(0);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account,
                balance: *balance,
                credit: amount,
            })?;
        *balance = new_balance;
        Ok(new_balance)
    }

    /// Debits `amount` from `account` without touching the supply.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the account holds
    /// less than `amount`.
    pub fn debit(&mut self, account: Address, amount: u128) -> Result<u128, LedgerError> {
        let balance = self.balance_of(&account);
        let new_balance = balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account,
                balance,
                requested: amount,
            })?;
        self.balances.insert(account, new_balance);
        Ok(new_balance)
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// Both sides of the move are validated before either balance is
    /// written. A self-transfer is balance-checked but otherwise a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less
    /// than `amount`, or [`LedgerError::BalanceOverflow`] if the credit
    /// side would overflow.
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(&from);
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                balance: from_balance,
                requested: amount,
            })?;

        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(&to);
        let new_to = to_balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account: to,
                balance: to_balance,
                credit: amount,
            })?;

        self.balances.insert(from, new_from);
        self.balances.insert(to, new_to);
        Ok(())
    }

    /// Creates `amount` new units in `account`, growing the supply.
    ///
    /// Supply and balance are both validated before either is written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SupplyOverflow`] or
    /// [`LedgerError::BalanceOverflow`] if either counter would exceed
    /// `u128::MAX`.
    pub fn mint_into(&mut self, account: Address, amount: u128) -> Result<(), LedgerError> {
        let new_supply =
            self.total_supply
                .checked_add(amount)
                .ok_or(LedgerError::SupplyOverflow {
                    supply: self.total_supply,
                    credit: amount,
                })?;

        let balance = self.balance_of(&account);
        let new_balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account,
                balance,
                credit: amount,
            })?;

        self.total_supply = new_supply;
        self.balances.insert(account, new_balance);
        Ok(())
    }

    /// Destroys `amount` units held by `account`, shrinking the supply.
    ///
    /// The balance check is the debit primitive's; the supply can never
    /// underflow once the debit succeeds, because no balance exceeds it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the account holds
    /// less than `amount`.
    pub fn burn_from(&mut self, account: Address, amount: u128) -> Result<(), LedgerError> {
        self.debit(account, amount)?;
        self.total_supply = self.total_supply.saturating_sub(amount);
        Ok(())
    }

    /// Returns all non-zero balances as `(Address, amount)` pairs.
    pub fn all_balances(&self) -> Vec<(Address, u128)> {
        self.balances
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .map(|(addr, amount)| (*addr, *amount))
            .collect()
    }

    /// Sum of every recorded balance. Equal to [`total_supply`](Self::total_supply)
    /// whenever the conservation invariant holds.
    pub fn balance_total(&self) -> u128 {
        self.balances.values().sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
