//! # Foreign Assets
//!
//! The rescue operation moves tokens of *other* ledgers out of the
//! contract's own address. Those ledgers live behind the [`FungibleAsset`]
//! trait: the one primitive the contract ever invokes on them is
//! `transfer`, and a failure there propagates to the caller unchanged.
//!
//! The host resolves asset identifiers to concrete ledgers through
//! [`AssetRegistry`]. An identifier nobody answers to fails the external
//! call with [`AssetError::UnknownAsset`] -- there is no allow-list and no
//! special-casing of any particular identifier; which ledger answers is
//! entirely the registry's business.
//!
//! [`SimpleAsset`] is a minimal standalone implementation backed by a
//! [`LedgerStore`], used by the test suite and the CLI sandbox to stand in
//! for an arbitrary third-party token.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::address::Address;
use crate::ledger::{LedgerError, LedgerStore};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reported by an external asset ledger.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No ledger is deployed at the given identifier.
    #[error("unknown asset: no ledger deployed at {0}")]
    UnknownAsset(Address),

    /// The source account holds less of the asset than requested.
    #[error("insufficient asset balance: {account} holds {balance}, requested {requested}")]
    InsufficientBalance {
        /// The account that was being debited.
        account: Address,
        /// The account's balance in the foreign asset.
        balance: u128,
        /// The amount that was requested.
        requested: u128,
    },

    /// The credit side of the transfer would overflow.
    #[error("asset balance overflow: {account} holds {balance}, credit {credit}")]
    BalanceOverflow {
        /// The account that was being credited.
        account: Address,
        /// The balance before the failed credit.
        balance: u128,
        /// The amount that caused the overflow.
        credit: u128,
    },
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The transfer primitive of an external fungible-asset ledger.
pub trait FungibleAsset {
    /// Moves `amount` of this asset from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::InsufficientBalance`] if `from` holds less
    /// than `amount`; implementations may report other failures of their
    /// own bookkeeping.
    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), AssetError>;

    /// Returns `account`'s balance in this asset.
    fn balance_of(&self, account: &Address) -> u128;
}

/// Host-side resolution of asset identifiers to deployed ledgers.
pub trait AssetRegistry {
    /// Returns the ledger deployed at `id`, or `None` if there is none.
    fn asset_mut(&mut self, id: &Address) -> Option<&mut dyn FungibleAsset>;
}

impl AssetRegistry for BTreeMap<Address, SimpleAsset> {
    fn asset_mut(&mut self, id: &Address) -> Option<&mut dyn FungibleAsset> {
        self.get_mut(id).map(|asset| asset as &mut dyn FungibleAsset)
    }
}

// ---------------------------------------------------------------------------
// SimpleAsset
// ---------------------------------------------------------------------------

/// A free-standing fungible asset with open minting.
///
/// Exists so that rescue paths can be exercised against a real ledger:
/// deploy one, credit the contract's address with some of it, and watch
/// `withdraw_stuck_tokens` move it back out. Nothing guards `mint` --
/// this is scaffolding, not a product token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleAsset {
    /// Display symbol, purely informational.
    symbol: String,
    /// The asset's own balance bookkeeping.
    ledger: LedgerStore,
}

impl SimpleAsset {
    /// Creates an empty asset with the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ledger: LedgerStore::new(),
        }
    }

    /// Returns the asset's symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the asset's total supply.
    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Creates `amount` units in `account`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::BalanceOverflow`] if either the balance or
    /// the supply counter would overflow.
    pub fn mint(&mut self, account: Address, amount: u128) -> Result<(), AssetError> {
        self.ledger
            .mint_into(account, amount)
            .map_err(map_ledger_error)
    }
}

impl FungibleAsset for SimpleAsset {
    fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<(), AssetError> {
        self.ledger
            .transfer(from, to, amount)
            .map_err(map_ledger_error)
    }

    fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }
}

/// Translates internal bookkeeping failures into the external-asset
/// vocabulary the rescue path propagates.
fn map_ledger_error(err: LedgerError) -> AssetError {
    match err {
        LedgerError::InsufficientBalance {
            account,
            balance,
            requested,
        } => AssetError::InsufficientBalance {
            account,
            balance,
            requested,
        },
        LedgerError::BalanceOverflow {
            account,
            balance,
            credit,
        } => AssetError::BalanceOverflow {
            account,
            balance,
            credit,
        },
        // A supply overflow on mint is an overflow of the asset as a
        // whole; there is no single account to attribute it to.
        LedgerError::SupplyOverflow { supply, credit } => AssetError::BalanceOverflow {
            account: Address::ZERO,
            balance: supply,
            credit,
        },
        // SimpleAsset never spends allowances; keep the mapping total.
        LedgerError::InsufficientAllowance { requested, .. } => AssetError::InsufficientBalance {
            account: Address::ZERO,
            balance: 0,
            requested,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn mint_and_transfer() {
        let mut asset = SimpleAsset::new("MCK");
        asset.mint(addr(1), 1000).unwrap();
        asset.transfer(addr(1), addr(2), 400).unwrap();

        assert_eq!(asset.balance_of(&addr(1)), 600);
        assert_eq!(asset.balance_of(&addr(2)), 400);
        assert_eq!(asset.total_supply(), 1000);
    }

    #[test]
    fn transfer_insufficient_reports_asset_error() {
        let mut asset = SimpleAsset::new("MCK");
        asset.mint(addr(1), 100).unwrap();

        let err = asset.transfer(addr(1), addr(2), 200).unwrap_err();
        assert!(matches!(
            err,
            AssetError::InsufficientBalance {
                balance: 100,
                requested: 200,
                ..
            }
        ));
    }

    #[test]
    fn registry_resolves_deployed_assets_only() {
        let mut registry: BTreeMap<Address, SimpleAsset> = BTreeMap::new();
        registry.insert(addr(9), SimpleAsset::new("MCK"));

        assert!(registry.asset_mut(&addr(9)).is_some());
        assert!(registry.asset_mut(&addr(8)).is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut asset = SimpleAsset::new("MCK");
        asset.mint(addr(1), 77).unwrap();

        let json = serde_json::to_string(&asset).expect("serialize");
        let recovered: SimpleAsset = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(recovered.symbol(), "MCK");
        assert_eq!(recovered.balance_of(&addr(1)), 77);
    }
}
