//! # Phoenix Token Contract
//!
//! A single-asset fungible-token ledger administered by one owner. Supply
//! is elastic: the owner mints and burns at will. Tokens of *other*
//! ledgers that end up stranded at the contract's own address can be
//! rescued back to the owner, and the contract flatly refuses to accept
//! native currency through either of its catch-all entry points.
//!
//! ## Security Model
//!
//! - **Owner gating**: `mint`, `burn`, `withdraw_stuck_tokens`, and
//!   `transfer_ownership` all require the caller to be the recorded owner.
//!   The guard runs before any argument validation.
//! - **Validation before mutation**: zero addresses and zero amounts are
//!   rejected, in that order, before a single balance is touched. Every
//!   error carries the offending value.
//! - **One-shot initialization**: deployment installs an inert contract;
//!   [`initialize`](PhoenixToken::initialize) seeds the supply and claims
//!   ownership exactly once, and the latch survives persistence, so a
//!   reloaded (upgraded) instance cannot be re-seeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::Address;
use crate::asset::{AssetError, AssetRegistry};
use crate::event::Event;
use crate::ledger::{LedgerError, LedgerStore};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Display name of the token.
pub const TOKEN_NAME: &str = "Phoenix Token";

/// Ticker symbol.
pub const TOKEN_SYMBOL: &str = "PT";

/// Decimal precision. A balance of `10^18` base units displays as `1.0`.
pub const TOKEN_DECIMALS: u8 = 18;

/// One whole token in base units.
pub const BASE_UNIT: u128 = 10u128.pow(TOKEN_DECIMALS as u32);

/// Supply credited to the owner at initialization: one million whole
/// tokens, scaled by the decimal precision.
pub const INITIAL_SUPPLY: u128 = 1_000_000 * BASE_UNIT;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by the token's callable operations.
///
/// Each variant is a distinct, parameterized signal; nothing is downgraded
/// to a generic failure string, so callers can disambiguate
/// programmatically.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Re-entry into the one-shot initialization routine.
    #[error("already initialized")]
    AlreadyInitialized,

    /// A privileged operation was attempted by someone other than the owner.
    #[error("unauthorized: {caller} is not the contract owner")]
    Unauthorized {
        /// The identity that made the call.
        caller: Address,
    },

    /// A required account or asset identifier was the null identity.
    #[error("zero address: {address} is not a valid target")]
    ZeroAddress {
        /// The offending identifier.
        address: Address,
    },

    /// A required amount argument was zero.
    #[error("zero amount: {amount}")]
    ZeroAmount {
        /// The offending amount.
        amount: u128,
    },

    /// A bookkeeping primitive failed (insufficient balance or allowance,
    /// arithmetic overflow).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An external asset ledger rejected the rescue transfer. Propagated
    /// unchanged -- the contract performs no local recovery.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Native currency was sent to the contract, with or without payload.
    #[error("unexpected call: this contract does not accept native currency")]
    UnexpectedCall,
}

// ---------------------------------------------------------------------------
// PhoenixToken
// ---------------------------------------------------------------------------

/// The Phoenix token contract state.
///
/// A freshly deployed instance is inert: it has no owner, no supply, and
/// every privileged operation fails. [`initialize`](Self::initialize)
/// flips it to its active state, after which the full operation table is
/// available, gated per-operation by the guards above.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhoenixToken {
    /// The contract's own address -- the source of rescue transfers.
    address: Address,
    /// The administrator. `Address::ZERO` until initialization, never
    /// zero afterwards.
    owner: Address,
    /// One-shot initialization latch.
    initialized: bool,
    /// Display name, set at initialization.
    name: String,
    /// Ticker symbol, set at initialization.
    symbol: String,
    /// Decimal precision, set at initialization.
    decimals: u8,
    /// Balances, allowances, and total supply.
    ledger: LedgerStore,
    /// When the contract was initialized.
    initialized_at: Option<DateTime<Utc>>,
    /// Events recorded by operations since the last drain.
    events: Vec<Event>,
}

impl PhoenixToken {
    /// Deploys an uninitialized contract at `address`.
    pub fn deploy(address: Address) -> Self {
        Self {
            address,
            owner: Address::ZERO,
            initialized: false,
            name: String::new(),
            symbol: String::new(),
            decimals: 0,
            ledger: LedgerStore::new(),
            initialized_at: None,
            events: Vec::new(),
        }
    }

    // -- lifecycle ----------------------------------------------------------

    /// Activates the contract: records `caller` as owner, sets the token
    /// metadata, and credits the owner with the full initial supply.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::AlreadyInitialized`] on any call after the
    /// first successful one, and [`TokenError::ZeroAddress`] if the caller
    /// is the null identity (the owner slot must never hold it).
    pub fn initialize(&mut self, caller: Address) -> Result<(), TokenError> {
        if self.initialized {
            return Err(TokenError::AlreadyInitialized);
        }
        Self::ensure_nonzero_address(caller)?;

        self.owner = caller;
        self.name = TOKEN_NAME.to_string();
        self.symbol = TOKEN_SYMBOL.to_string();
        self.decimals = TOKEN_DECIMALS;
        self.ledger.mint_into(caller, INITIAL_SUPPLY)?;
        self.initialized_at = Some(Utc::now());
        self.initialized = true;
        Ok(())
    }

    // -- privileged operations ----------------------------------------------

    /// Creates `amount` new tokens in `recipient`'s balance.
    ///
    /// # Errors
    ///
    /// [`TokenError::Unauthorized`] unless the caller is the owner, then
    /// [`TokenError::ZeroAddress`] / [`TokenError::ZeroAmount`] in that
    /// order. No state is touched on any failure path.
    pub fn mint(
        &mut self,
        caller: Address,
        recipient: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        Self::ensure_nonzero_address(recipient)?;
        Self::ensure_nonzero_amount(amount)?;

        self.ledger.mint_into(recipient, amount)?;
        self.events.push(Event::Minted { recipient, amount });
        Ok(())
    }

    /// Destroys `amount` tokens held by `account`.
    ///
    /// The balance precondition is enforced by the underlying debit
    /// primitive, which raises
    /// [`LedgerError::InsufficientBalance`] when the account holds less
    /// than `amount`.
    ///
    /// # Errors
    ///
    /// Same guard and validation order as [`mint`](Self::mint).
    pub fn burn(
        &mut self,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        Self::ensure_nonzero_address(account)?;
        Self::ensure_nonzero_amount(amount)?;

        self.ledger.burn_from(account, amount)?;
        self.events.push(Event::Burned { account, amount });
        Ok(())
    }

    /// Moves `amount` of a *foreign* asset held at the contract's own
    /// address back to the owner.
    ///
    /// The asset identifier is resolved through the host's `registry`;
    /// whichever ledger answers performs the transfer, and its failure
    /// propagates unchanged. Deliberately unrestricted: no allow-list,
    /// no self-referential guard -- correct use rests on the owner.
    ///
    /// # Errors
    ///
    /// Guard and validation as for [`mint`](Self::mint), then any
    /// [`AssetError`] from the resolved ledger (including
    /// [`AssetError::UnknownAsset`] when nothing answers the identifier).
    pub fn withdraw_stuck_tokens(
        &mut self,
        caller: Address,
        asset: Address,
        amount: u128,
        registry: &mut dyn AssetRegistry,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        Self::ensure_nonzero_address(asset)?;
        Self::ensure_nonzero_amount(amount)?;

        let foreign = registry
            .asset_mut(&asset)
            .ok_or(AssetError::UnknownAsset(asset))?;
        foreign.transfer(self.address, self.owner, amount)?;

        self.events.push(Event::StuckTokensWithdrawn { asset, amount });
        Ok(())
    }

    /// Hands the administrator identity to `new_owner`.
    ///
    /// # Errors
    ///
    /// [`TokenError::Unauthorized`] unless the caller is the current
    /// owner; [`TokenError::ZeroAddress`] if `new_owner` is the null
    /// identity.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        Self::ensure_nonzero_address(new_owner)?;

        let previous_owner = self.owner;
        self.owner = new_owner;
        self.events.push(Event::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    // -- standard ledger operations -----------------------------------------

    /// Moves `amount` from the caller's balance to `to`.
    ///
    /// # Errors
    ///
    /// [`TokenError::ZeroAddress`] for a null recipient;
    /// [`LedgerError::InsufficientBalance`] from the store.
    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        Self::ensure_nonzero_address(to)?;

        self.ledger.transfer(caller, to, amount)?;
        self.events.push(Event::Transfer {
            from: caller,
            to,
            amount,
        });
        Ok(())
    }

    /// Sets `spender`'s allowance over the caller's balance to `amount`.
    ///
    /// # Errors
    ///
    /// [`TokenError::ZeroAddress`] for a null spender.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        Self::ensure_nonzero_address(spender)?;

        self.ledger.approve(caller, spender, amount);
        self.events.push(Event::Approval {
            owner: caller,
            spender,
            amount,
        });
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on the strength of an allowance
    /// granted to the caller.
    ///
    /// The allowance is checked before anything mutates and decremented
    /// after the move succeeds, so a failure on either check leaves both
    /// balances and the allowance untouched.
    ///
    /// # Errors
    ///
    /// [`TokenError::ZeroAddress`] for a null `from` or `to`;
    /// [`LedgerError::InsufficientAllowance`] or
    /// [`LedgerError::InsufficientBalance`] from the bookkeeping.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        Self::ensure_nonzero_address(from)?;
        Self::ensure_nonzero_address(to)?;

        let allowance = self.ledger.allowance(&from, &caller);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from,
                spender: caller,
                allowance,
                requested: amount,
            }
            .into());
        }

        self.ledger.transfer(from, to, amount)?;
        self.ledger.approve(from, caller, allowance - amount);
        self.events.push(Event::Transfer { from, to, amount });
        Ok(())
    }

    // -- catch-all entry points ---------------------------------------------

    /// Entry point for a direct value transfer carrying no payload.
    ///
    /// # Errors
    ///
    /// Always [`TokenError::UnexpectedCall`].
    pub fn receive(&self, _value: u128) -> Result<(), TokenError> {
        self.reject_value_transfer()
    }

    /// Entry point for a value transfer (or call) whose payload matches no
    /// declared operation.
    ///
    /// # Errors
    ///
    /// Always [`TokenError::UnexpectedCall`].
    pub fn fallback(&self, _value: u128, _data: &[u8]) -> Result<(), TokenError> {
        self.reject_value_transfer()
    }

    /// The single shared failure path for both catch-all entry points.
    fn reject_value_transfer(&self) -> Result<(), TokenError> {
        Err(TokenError::UnexpectedCall)
    }

    // -- queries ------------------------------------------------------------

    /// The contract's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current owner. `Address::ZERO` before initialization.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Whether the one-shot initialization has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Token display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Decimal precision.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Current total supply in base units.
    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    /// Balance of `account` in base units.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Remaining allowance of `spender` over `owner`'s balance.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    /// When the contract was initialized, if it has been.
    pub fn initialized_at(&self) -> Option<DateTime<Utc>> {
        self.initialized_at
    }

    /// Read access to the underlying store.
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Events recorded since the last drain.
    pub fn pending_events(&self) -> &[Event] {
        &self.events
    }

    /// Drains and returns the pending events.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // -- guards -------------------------------------------------------------

    /// Caller must be the recorded owner. Before initialization there is
    /// no owner, so every privileged call fails here.
    fn ensure_owner(&self, caller: Address) -> Result<(), TokenError> {
        if !self.initialized || caller != self.owner {
            return Err(TokenError::Unauthorized { caller });
        }
        Ok(())
    }

    fn ensure_nonzero_address(address: Address) -> Result<(), TokenError> {
        if address.is_zero() {
            return Err(TokenError::ZeroAddress { address });
        }
        Ok(())
    }

    fn ensure_nonzero_amount(amount: u128) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount { amount });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
