// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # TCO2 Faucet CLI
//!
//! Entry point for the `tco2-faucet` binary. Parses CLI arguments,
//! initializes logging, and dispatches to a command handler that operates on
//! the local state file.
//!
//! - `init`       — deploy a token and a faucet into a new state file
//! - `approve`    — grant the faucet an allowance
//! - `deposit`    — approve-then-deposit (or deposit against an allowance)
//! - `balance`    — the faucet's held balance
//! - `balance-of` — an account's token balance
//! - `reconcile`  — ledger vs. token view of the faucet address
//! - `events`     — accepted deposits
//! - `version`    — build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, FaucetCli};

fn main() -> Result<()> {
    let cli = FaucetCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(&logging::default_directive(&cli.log_level), cli.log_format);

    let state = cli.state.as_path();
    let output = match cli.command {
        Commands::Init(args) => commands::init(state, args),
        Commands::Approve(args) => commands::approve(state, args),
        Commands::Deposit(args) => commands::deposit(state, args),
        Commands::Balance(args) => commands::balance(state, args),
        Commands::BalanceOf(args) => commands::balance_of(state, args),
        Commands::Reconcile => commands::reconcile(state),
        Commands::Events => commands::events(state),
        Commands::Version => unreachable!("handled before logging is initialized"),
    }?;

    println!("{output}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("tco2-faucet {}", env!("CARGO_PKG_VERSION"));
    println!("state     v{}", tco2_protocol::config::STATE_FORMAT_VERSION);
    println!("rustc     {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
