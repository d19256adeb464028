//! # CLI Interface
//!
//! Defines the command-line argument structure for `tco2-faucet` using
//! `clap` derive. Every subcommand operates on one JSON state file holding
//! the token and the faucet deployed for it.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tco2_protocol::config::{
    DEFAULT_DEPOSITOR_ADDRESS, DEFAULT_INITIAL_SUPPLY, DEFAULT_STATE_FILE, DEFAULT_TCO2_ADDRESS,
    TCO2_DECIMALS, TCO2_NAME, TCO2_SYMBOL,
};
use tco2_protocol::Address;

use crate::logging::LogFormat;

/// TCO2 faucet operator tool.
///
/// Deploys a faucet for a TCO2 token into a local state file, deposits into
/// it with the approve-then-deposit handshake, and queries balances.
#[derive(Parser, Debug)]
#[command(
    name = "tco2-faucet",
    about = "Custodial TCO2 faucet operator tool",
    version,
    propagate_version = true
)]
pub struct FaucetCli {
    /// Path to the state file.
    #[arg(
        long,
        short = 's',
        global = true,
        env = "TCO2_FAUCET_STATE",
        default_value = DEFAULT_STATE_FILE
    )]
    pub state: PathBuf,

    /// Log level for the workspace crates. `RUST_LOG` takes precedence.
    #[arg(long, global = true, env = "TCO2_FAUCET_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a token and a faucet for it into a new state file.
    Init(InitArgs),
    /// Approve the faucet to pull tokens from an account.
    Approve(ApproveArgs),
    /// Deposit tokens into the faucet.
    Deposit(DepositArgs),
    /// Show the faucet's held balance for a token.
    Balance(BalanceArgs),
    /// Show the token balance of an account.
    BalanceOf(BalanceOfArgs),
    /// Compare the faucet's ledger with the token's view of its address.
    Reconcile,
    /// List every deposit the faucet has accepted.
    Events,
    /// Print version information and exit.
    Version,
}

/// Arguments for the `init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Address of the token contract.
    #[arg(long, default_value_t = DEFAULT_TCO2_ADDRESS)]
    pub token: Address,

    /// Account funded with the initial supply.
    #[arg(long, default_value_t = DEFAULT_DEPOSITOR_ADDRESS)]
    pub holder: Address,

    /// Initial supply minted to the holder, in whole tokens.
    #[arg(long, default_value = DEFAULT_INITIAL_SUPPLY)]
    pub supply: String,

    /// Token name.
    #[arg(long, default_value = TCO2_NAME)]
    pub name: String,

    /// Token symbol.
    #[arg(long, default_value = TCO2_SYMBOL)]
    pub symbol: String,

    /// Token decimals.
    #[arg(long, default_value_t = TCO2_DECIMALS)]
    pub decimals: u8,

    /// Fixed faucet address. A random one is generated when omitted.
    #[arg(long)]
    pub faucet: Option<Address>,

    /// Overwrite an existing state file.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `approve` subcommand.
#[derive(Args, Debug)]
pub struct ApproveArgs {
    /// Account granting the allowance.
    #[arg(long, default_value_t = DEFAULT_DEPOSITOR_ADDRESS)]
    pub owner: Address,

    /// Allowance in whole tokens (e.g. `1.0`).
    #[arg(long)]
    pub amount: String,
}

/// Arguments for the `deposit` subcommand.
#[derive(Args, Debug)]
pub struct DepositArgs {
    /// Account the tokens are pulled from.
    #[arg(long, default_value_t = DEFAULT_DEPOSITOR_ADDRESS)]
    pub from: Address,

    /// Amount in whole tokens (e.g. `1.0`).
    #[arg(long)]
    pub amount: String,

    /// Use the existing allowance instead of approving the amount first.
    #[arg(long)]
    pub no_approve: bool,
}

/// Arguments for the `balance` subcommand.
#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Token to query. Defaults to the faucet's configured token.
    #[arg(long)]
    pub token: Option<Address>,
}

/// Arguments for the `balance-of` subcommand.
#[derive(Args, Debug)]
pub struct BalanceOfArgs {
    /// Account to query.
    #[arg(long, default_value_t = DEFAULT_DEPOSITOR_ADDRESS)]
    pub account: Address,
}
