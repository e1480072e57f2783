//! Integration tests for the host execution boundary.
//!
//! Everything here is about the environment's guarantees rather than any
//! single operation: total rollback on failure, receipt delivery, asset
//! resolution, and survival of the initialization latch across a
//! persistence round trip (the upgrade boundary).

use phoenix_ledger::address::Address;
use phoenix_ledger::asset::{AssetError, FungibleAsset, SimpleAsset};
use phoenix_ledger::event::Event;
use phoenix_ledger::runtime::{Call, CallContext, Host, Receipt};
use phoenix_ledger::token::{TokenError, INITIAL_SUPPLY};

fn addr(n: u8) -> Address {
    Address::from_bytes([n; 20])
}

fn owner() -> Address {
    addr(1)
}

fn active_host() -> Host {
    let mut host = Host::deploy(addr(0xCC));
    host.execute(CallContext::new(owner()), Call::Initialize)
        .unwrap();
    host
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[test]
fn every_failure_kind_leaves_state_byte_identical() {
    let mut host = active_host();
    host.register_asset(addr(9), SimpleAsset::new("MCK"));
    let before = serde_json::to_string(&host).unwrap();

    let failing_calls: Vec<(Address, Call)> = vec![
        // AlreadyInitialized
        (owner(), Call::Initialize),
        // Unauthorized
        (
            addr(2),
            Call::Mint {
                recipient: addr(2),
                amount: 1,
            },
        ),
        // ZeroAddress
        (
            owner(),
            Call::Mint {
                recipient: Address::ZERO,
                amount: 1,
            },
        ),
        // ZeroAmount
        (
            owner(),
            Call::Burn {
                account: owner(),
                amount: 0,
            },
        ),
        // InsufficientBalance
        (
            owner(),
            Call::Burn {
                account: owner(),
                amount: INITIAL_SUPPLY + 1,
            },
        ),
        // InsufficientAllowance
        (
            addr(2),
            Call::TransferFrom {
                from: owner(),
                to: addr(2),
                amount: 1,
            },
        ),
        // External asset failure
        (
            owner(),
            Call::WithdrawStuckTokens {
                asset: addr(9),
                amount: 1,
            },
        ),
        // UnexpectedCall, both entry points
        (addr(2), Call::Receive { value: 7 }),
        (
            addr(2),
            Call::Fallback {
                value: 7,
                data: vec![0xFF],
            },
        ),
    ];

    for (caller, call) in failing_calls {
        assert!(
            host.execute(CallContext::new(caller), call.clone()).is_err(),
            "expected {} to fail",
            call.name()
        );
        assert_eq!(
            serde_json::to_string(&host).unwrap(),
            before,
            "state drifted after failed {}",
            call.name()
        );
    }
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

#[test]
fn receipts_carry_exactly_one_event_per_operation() {
    let mut host = active_host();
    let ctx = CallContext::new(owner());

    let mint = host
        .execute(
            ctx,
            Call::Mint {
                recipient: addr(2),
                amount: 10,
            },
        )
        .unwrap();
    let approve = host
        .execute(
            CallContext::new(addr(2)),
            Call::Approve {
                spender: addr(3),
                amount: 6,
            },
        )
        .unwrap();
    let delegated = host
        .execute(
            CallContext::new(addr(3)),
            Call::TransferFrom {
                from: addr(2),
                to: addr(4),
                amount: 6,
            },
        )
        .unwrap();

    assert_eq!(
        mint,
        Receipt {
            events: vec![Event::Minted {
                recipient: addr(2),
                amount: 10,
            }],
        }
    );
    assert_eq!(
        approve.events,
        vec![Event::Approval {
            owner: addr(2),
            spender: addr(3),
            amount: 6,
        }]
    );
    assert_eq!(
        delegated.events,
        vec![Event::Transfer {
            from: addr(2),
            to: addr(4),
            amount: 6,
        }]
    );
    assert_eq!(host.token().allowance(&addr(2), &addr(3)), 0);
}

#[test]
fn ownership_handover_through_the_host() {
    let mut host = active_host();
    let receipt = host
        .execute(
            CallContext::new(owner()),
            Call::TransferOwnership { new_owner: addr(5) },
        )
        .unwrap();

    assert_eq!(
        receipt.events,
        vec![Event::OwnershipTransferred {
            previous_owner: owner(),
            new_owner: addr(5),
        }]
    );
    assert_eq!(host.token().owner(), addr(5));

    // The privilege moved with the identity.
    assert!(host
        .execute(
            CallContext::new(owner()),
            Call::Mint {
                recipient: addr(2),
                amount: 1,
            },
        )
        .is_err());
    assert!(host
        .execute(
            CallContext::new(addr(5)),
            Call::Mint {
                recipient: addr(2),
                amount: 1,
            },
        )
        .is_ok());
}

// ---------------------------------------------------------------------------
// Asset Resolution
// ---------------------------------------------------------------------------

#[test]
fn unresolved_asset_identifier_fails_the_external_call() {
    let mut host = active_host();
    let err = host
        .execute(
            CallContext::new(owner()),
            Call::WithdrawStuckTokens {
                asset: addr(9),
                amount: 1,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TokenError::Asset(AssetError::UnknownAsset(id)) if id == addr(9)
    ));
}

#[test]
fn registry_keeps_assets_independent() {
    let mut host = active_host();
    let contract = host.token().address();

    let mut first = SimpleAsset::new("AAA");
    first.mint(contract, 100).unwrap();
    let mut second = SimpleAsset::new("BBB");
    second.mint(contract, 5).unwrap();
    host.register_asset(addr(8), first);
    host.register_asset(addr(9), second);

    host.execute(
        CallContext::new(owner()),
        Call::WithdrawStuckTokens {
            asset: addr(8),
            amount: 60,
        },
    )
    .unwrap();

    assert_eq!(host.asset(&addr(8)).unwrap().balance_of(&contract), 40);
    assert_eq!(host.asset(&addr(9)).unwrap().balance_of(&contract), 5);
}

// ---------------------------------------------------------------------------
// Persistence (the upgrade boundary)
// ---------------------------------------------------------------------------

#[test]
fn latch_survives_a_persistence_roundtrip() {
    let mut host = active_host();
    host.execute(
        CallContext::new(owner()),
        Call::Mint {
            recipient: addr(2),
            amount: 123,
        },
    )
    .unwrap();

    let json = serde_json::to_string(&host).unwrap();
    let mut reloaded: Host = serde_json::from_str(&json).unwrap();

    // Balances and metadata came back...
    assert_eq!(reloaded.token().balance_of(&addr(2)), 123);
    assert_eq!(reloaded.token().total_supply(), INITIAL_SUPPLY + 123);

    // ...and the reloaded instance still refuses to re-seed.
    let err = reloaded
        .execute(CallContext::new(owner()), Call::Initialize)
        .unwrap_err();
    assert!(matches!(err, TokenError::AlreadyInitialized));
}
