//! # Domain Events
//!
//! Every successful state-mutating operation records exactly one [`Event`]
//! describing what happened. Events accumulate in the contract's pending
//! journal and are delivered to the caller in the call receipt; a failed
//! call delivers none.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

/// An observable record of a completed ledger operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Value moved between two accounts.
    Transfer {
        /// Account that was debited.
        from: Address,
        /// Account that was credited.
        to: Address,
        /// Amount moved, in base units.
        amount: u128,
    },

    /// A spending allowance was set.
    Approval {
        /// Account whose balance may be spent.
        owner: Address,
        /// Delegate granted the allowance.
        spender: Address,
        /// The new allowance, replacing any previous value.
        amount: u128,
    },

    /// New supply was created.
    Minted {
        /// Account credited with the new units.
        recipient: Address,
        /// Amount created, in base units.
        amount: u128,
    },

    /// Supply was destroyed.
    Burned {
        /// Account the units were removed from.
        account: Address,
        /// Amount destroyed, in base units.
        amount: u128,
    },

    /// Mistakenly-deposited foreign tokens were returned to the owner.
    StuckTokensWithdrawn {
        /// Identifier of the foreign asset's ledger.
        asset: Address,
        /// Amount moved to the owner, in the foreign asset's base units.
        amount: u128,
    },

    /// The administrator identity changed hands.
    OwnershipTransferred {
        /// The outgoing owner.
        previous_owner: Address,
        /// The incoming owner.
        new_owner: Address,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Transfer { from, to, amount } => {
                write!(f, "Transfer({} -> {}, {})", from, to, amount)
            }
            Event::Approval {
                owner,
                spender,
                amount,
            } => write!(f, "Approval({} allows {}, {})", owner, spender, amount),
            Event::Minted { recipient, amount } => write!(f, "Minted({}, {})", recipient, amount),
            Event::Burned { account, amount } => write!(f, "Burned({}, {})", account, amount),
            Event::StuckTokensWithdrawn { asset, amount } => {
                write!(f, "StuckTokensWithdrawn({}, {})", asset, amount)
            }
            Event::OwnershipTransferred {
                previous_owner,
                new_owner,
            } => write!(
                f,
                "OwnershipTransferred({} -> {})",
                previous_owner, new_owner
            ),
        }
    }
}
