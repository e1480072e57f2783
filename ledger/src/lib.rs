// Copyright (c) 2026 Phoenix Labs. MIT License.
// See LICENSE for details.

//! # Phoenix Token -- Ledger Core
//!
//! A single-asset, owner-administered fungible-token ledger with elastic
//! supply, an escape hatch for foreign tokens that end up stranded at the
//! contract's address, and a hard "no" to anyone trying to send native
//! currency here.
//!
//! ## Architecture
//!
//! The crate is split along the actual seams of the system:
//!
//! - **address** -- Opaque 20-byte account identifiers. The all-zero value
//!   is the null identity and never a valid target.
//! - **ledger** -- Balances, allowances, and the total-supply counter, with
//!   checked arithmetic that fails instead of wrapping.
//! - **token** -- The contract itself: one-shot initialization, owner-gated
//!   mint/burn, the standard transfer/approval surface, and the rescue
//!   operation.
//! - **asset** -- The trait seam to external asset ledgers, crossed only by
//!   the rescue path.
//! - **event** -- What the outside world gets to observe.
//! - **runtime** -- The host boundary: serialized calls, snapshot rollback,
//!   receipts, and the two catch-all entry points.
//!
//! ## Design Rules
//!
//! 1. Authorization before validation, validation before mutation, events
//!    last. No reachable path leaves balances and supply inconsistent.
//! 2. Monetary arithmetic is checked everywhere. Wrapping and money do
//!    not mix.
//! 3. Every error is a typed, parameterized signal carrying the offending
//!    value. Callers disambiguate by kind, not by string matching.
//! 4. Every public type is serializable (serde) for persistence and
//!    inspection.

pub mod address;
pub mod asset;
pub mod event;
pub mod ledger;
pub mod runtime;
pub mod token;
