//! # Host Execution Environment
//!
//! The [`Host`] plays the part of the execution environment the contract
//! is deployed into: it owns the contract state plus the registry of
//! foreign-asset ledgers, serializes calls through a single entry point,
//! and guarantees all-or-nothing effects per call.
//!
//! Every call runs against a snapshot boundary: on success the pending
//! events are drained into a [`Receipt`]; on failure the entire state --
//! balances, supply, allowances, ownership, foreign assets, and any
//! half-recorded events -- is restored to its pre-call value and the error
//! is returned. Subsequent calls can never observe a partial commit.
//!
//! Reads (`name`, `balance_of`, `total_supply`, ...) do not go through the
//! call boundary; query the contract directly via [`Host::token`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::address::Address;
use crate::asset::SimpleAsset;
use crate::event::Event;
use crate::token::{PhoenixToken, TokenError};

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Identity of the account making a call, as seen by the guard logic.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CallContext {
    /// The calling account.
    pub caller: Address,
}

impl CallContext {
    /// Context for a call made by `caller`.
    pub fn new(caller: Address) -> Self {
        Self { caller }
    }
}

/// A state-mutating entry point of the contract.
///
/// `Receive` and `Fallback` are the two catch-all entry points: the first
/// is a plain value transfer with no payload, the second a value transfer
/// (or call) whose payload matches no declared operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Call {
    /// One-shot activation: seed the supply, claim ownership.
    Initialize,
    /// Owner-only supply creation.
    Mint { recipient: Address, amount: u128 },
    /// Owner-only supply destruction.
    Burn { account: Address, amount: u128 },
    /// Move value from the caller to `to`.
    Transfer { to: Address, amount: u128 },
    /// Set the caller's allowance for `spender`.
    Approve { spender: Address, amount: u128 },
    /// Delegated move on the strength of an allowance.
    TransferFrom {
        from: Address,
        to: Address,
        amount: u128,
    },
    /// Owner-only handover of the administrator identity.
    TransferOwnership { new_owner: Address },
    /// Owner-only rescue of foreign tokens stranded at the contract.
    WithdrawStuckTokens { asset: Address, amount: u128 },
    /// Direct value transfer, no payload.
    Receive { value: u128 },
    /// Value transfer or call with an unmatched payload.
    Fallback { value: u128, data: Vec<u8> },
}

impl Call {
    /// Short operation name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Call::Initialize => "initialize",
            Call::Mint { .. } => "mint",
            Call::Burn { .. } => "burn",
            Call::Transfer { .. } => "transfer",
            Call::Approve { .. } => "approve",
            Call::TransferFrom { .. } => "transfer_from",
            Call::TransferOwnership { .. } => "transfer_ownership",
            Call::WithdrawStuckTokens { .. } => "withdraw_stuck_tokens",
            Call::Receive { .. } => "receive",
            Call::Fallback { .. } => "fallback",
        }
    }
}

/// The observable outcome of a successful call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Events recorded by the operation, in emission order.
    pub events: Vec<Event>,
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// The execution environment holding the contract and its neighbours.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Host {
    /// The deployed Phoenix token contract.
    token: PhoenixToken,
    /// Foreign-asset ledgers, keyed by their deployed address.
    assets: BTreeMap<Address, SimpleAsset>,
}

impl Host {
    /// Deploys an uninitialized contract at `contract_address`.
    pub fn deploy(contract_address: Address) -> Self {
        Self {
            token: PhoenixToken::deploy(contract_address),
            assets: BTreeMap::new(),
        }
    }

    /// Deploys a foreign asset ledger at `address`, replacing any previous
    /// ledger there.
    pub fn register_asset(&mut self, address: Address, asset: SimpleAsset) {
        self.assets.insert(address, asset);
    }

    /// The contract, for reads.
    pub fn token(&self) -> &PhoenixToken {
        &self.token
    }

    /// The foreign asset at `address`, if one is deployed.
    pub fn asset(&self, address: &Address) -> Option<&SimpleAsset> {
        self.assets.get(address)
    }

    /// Executes one call as a transaction: full effect or none.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched operation raises; the state is rolled back
    /// to its pre-call value before the error is returned.
    pub fn execute(&mut self, ctx: CallContext, call: Call) -> Result<Receipt, TokenError> {
        let name = call.name();
        tracing::debug!(caller = %ctx.caller, call = name, "executing call");

        let token_snapshot = self.token.clone();
        let assets_snapshot = self.assets.clone();

        match self.dispatch(&ctx, call) {
            Ok(()) => {
                let events = self.token.take_events();
                tracing::debug!(call = name, events = events.len(), "call committed");
                Ok(Receipt { events })
            }
            Err(err) => {
                self.token = token_snapshot;
                self.assets = assets_snapshot;
                tracing::warn!(caller = %ctx.caller, call = name, error = %err, "call reverted");
                Err(err)
            }
        }
    }

    fn dispatch(&mut self, ctx: &CallContext, call: Call) -> Result<(), TokenError> {
        match call {
            Call::Initialize => self.token.initialize(ctx.caller),
            Call::Mint { recipient, amount } => self.token.mint(ctx.caller, recipient, amount),
            Call::Burn { account, amount } => self.token.burn(ctx.caller, account, amount),
            Call::Transfer { to, amount } => self.token.transfer(ctx.caller, to, amount),
            Call::Approve { spender, amount } => self.token.approve(ctx.caller, spender, amount),
            Call::TransferFrom { from, to, amount } => {
                self.token.transfer_from(ctx.caller, from, to, amount)
            }
            Call::TransferOwnership { new_owner } => {
                self.token.transfer_ownership(ctx.caller, new_owner)
            }
            Call::WithdrawStuckTokens { asset, amount } => {
                self.token
                    .withdraw_stuck_tokens(ctx.caller, asset, amount, &mut self.assets)
            }
            Call::Receive { value } => self.token.receive(value),
            Call::Fallback { value, data } => self.token.fallback(value, &data),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
