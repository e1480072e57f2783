// Copyright (c) 2026 Phoenix Labs. MIT License.
// See LICENSE for details.

//! # Phoenix Sandbox Node
//!
//! Entry point for the `phoenix-node` binary. Parses CLI arguments,
//! initializes logging, and drives the Phoenix token contract inside a
//! local host environment persisted to a JSON state file.
//!
//! The binary is the deployment-and-fixture tooling for the contract:
//! `deploy` installs and initializes the token exactly once per state
//! file, and the remaining subcommands submit calls to it, printing the
//! receipt events of every successful operation.

mod cli;
mod logging;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;

use phoenix_ledger::address::Address;
use phoenix_ledger::asset::SimpleAsset;
use phoenix_ledger::runtime::{Call, CallContext, Host, Receipt};
use phoenix_ledger::token::{TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};

use cli::{Commands, PhoenixNodeCli};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = PhoenixNodeCli::parse();
    logging::init_logging(
        "phoenix_node=info,phoenix_ledger=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Deploy(args) => deploy(args),
        Commands::Status(args) => status(args),
        Commands::Balance(args) => balance(args),
        Commands::Mint(args) => mint(args),
        Commands::Burn(args) => burn(args),
        Commands::Transfer(args) => transfer(args),
        Commands::RegisterAsset(args) => register_asset(args),
        Commands::Rescue(args) => rescue(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Deploys the contract and runs the one-shot initialization.
fn deploy(args: cli::DeployArgs) -> Result<()> {
    if args.state.exists() {
        bail!(
            "state file {} already exists; deploy installs and initializes exactly once",
            args.state.display()
        );
    }

    let contract = args.contract.unwrap_or_else(random_address);
    let owner = args.owner.unwrap_or_else(random_address);

    let mut host = Host::deploy(contract);
    host.execute(CallContext::new(owner), Call::Initialize)?;
    save_state(&args.state, &host)?;

    let token = host.token();
    tracing::info!(contract = %contract, owner = %owner, "token deployed and initialized");

    println!("Phoenix Token deployed.");
    println!("  State file : {}", args.state.display());
    println!("  Contract   : {}", contract);
    println!("  Owner      : {}", owner);
    println!("  Token      : {} ({})", token.name(), token.symbol());
    println!("  Supply     : {} base units", token.total_supply());
    Ok(())
}

/// Prints the token's metadata, supply, and owner.
fn status(args: cli::StateArgs) -> Result<()> {
    let host = load_state(&args.state)?;
    let token = host.token();

    println!("Phoenix Token status");
    println!("  Contract    : {}", token.address());
    println!("  Name        : {} ({})", token.name(), token.symbol());
    println!("  Decimals    : {}", token.decimals());
    println!("  Supply      : {} base units", token.total_supply());
    println!("  Owner       : {}", token.owner());
    match token.initialized_at() {
        Some(at) => println!("  Initialized : {}", at.to_rfc3339()),
        None => println!("  Initialized : never"),
    }
    Ok(())
}

/// Prints an account's balance.
fn balance(args: cli::BalanceArgs) -> Result<()> {
    let host = load_state(&args.state)?;
    println!(
        "{} holds {} base units",
        args.account,
        host.token().balance_of(&args.account)
    );
    Ok(())
}

fn mint(args: cli::MintArgs) -> Result<()> {
    submit(
        &args.state,
        args.caller,
        Call::Mint {
            recipient: args.recipient,
            amount: args.amount,
        },
    )
}

fn burn(args: cli::BurnArgs) -> Result<()> {
    submit(
        &args.state,
        args.caller,
        Call::Burn {
            account: args.account,
            amount: args.amount,
        },
    )
}

fn transfer(args: cli::TransferArgs) -> Result<()> {
    submit(
        &args.state,
        Some(args.from),
        Call::Transfer {
            to: args.to,
            amount: args.amount,
        },
    )
}

fn rescue(args: cli::RescueArgs) -> Result<()> {
    submit(
        &args.state,
        args.caller,
        Call::WithdrawStuckTokens {
            asset: args.asset,
            amount: args.amount,
        },
    )
}

/// Deploys a foreign asset into the host, optionally stranding some of
/// it at the contract's address for the rescue path to pick up.
fn register_asset(args: cli::RegisterAssetArgs) -> Result<()> {
    let mut host = load_state(&args.state)?;
    let address = args.address.unwrap_or_else(random_address);

    let mut asset = SimpleAsset::new(args.symbol.as_str());
    if args.stuck > 0 {
        asset.mint(host.token().address(), args.stuck)?;
    }
    host.register_asset(address, asset);
    save_state(&args.state, &host)?;

    tracing::info!(asset = %address, symbol = %args.symbol, stuck = args.stuck, "asset registered");
    println!("Asset {} deployed at {}", args.symbol, address);
    if args.stuck > 0 {
        println!(
            "  {} base units stranded at the contract's address",
            args.stuck
        );
    }
    Ok(())
}

/// Loads the host, submits one call, persists the new state, and prints
/// the receipt. A `None` caller defaults to the recorded owner.
fn submit(state: &Path, caller: Option<Address>, call: Call) -> Result<()> {
    let mut host = load_state(state)?;
    let caller = caller.unwrap_or_else(|| host.token().owner());
    let name = call.name();

    let receipt = host
        .execute(CallContext::new(caller), call)
        .with_context(|| format!("{} rejected", name))?;
    save_state(state, &host)?;
    print_receipt(&receipt);
    Ok(())
}

fn print_receipt(receipt: &Receipt) {
    println!("Call committed.");
    for event in &receipt.events {
        println!("  event: {}", event);
    }
}

/// Reads and deserializes the host state file.
fn load_state(path: &Path) -> Result<Host> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("state file {} is not valid host state", path.display()))
}

/// Serializes and writes the host state file.
fn save_state(path: &Path, host: &Host) -> Result<()> {
    let raw = serde_json::to_string_pretty(host).context("failed to serialize host state")?;
    fs::write(path, raw).with_context(|| format!("failed to write state file {}", path.display()))
}

/// A fresh random address for generated owners, contracts, and assets.
fn random_address() -> Address {
    Address::from_bytes(rand::random::<[u8; 20]>())
}

/// Prints version information to stdout.
fn print_version() {
    println!("phoenix-node {}", env!("CARGO_PKG_VERSION"));
    println!(
        "token        {} ({}), {} decimals",
        TOKEN_NAME, TOKEN_SYMBOL, TOKEN_DECIMALS
    );
}
