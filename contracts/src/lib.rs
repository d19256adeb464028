//! # TCO2 Faucet Contracts
//!
//! Contract logic for a custodial faucet that accepts deposits of one
//! tokenized carbon-offset credit (TCO2) and keeps the books on what it holds.
//!
//! - **Faucet** — the escrow ledger. Pulls approved tokens from a depositor
//!   and records its held balance for the configured token.
//! - **ERC-20** — an in-memory fungible token with standard allowance
//!   semantics, the collaborator the faucet pulls through.
//! - **Deposit** — the approve-then-deposit handshake performed on behalf of
//!   a depositor.
//! - **Shared** — a thread-safe handle that serializes every state change on
//!   one faucet.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic goes through `checked_add` and `checked_sub`;
//!    an underflow surfaces as the matching insufficient-funds error.
//! 2. Every check runs before the first mutation, so a failed call leaves
//!    all balances exactly as they were.
//! 3. Token failures surface as distinct error variants. Nothing is retried
//!    and nothing is collapsed into a generic error.
//! 4. Every public type is serializable (serde) for snapshots.

pub mod deposit;
pub mod erc20;
pub mod faucet;
pub mod shared;

pub use deposit::{approve_and_deposit, approve_and_deposit_units};
pub use erc20::Erc20Token;
pub use faucet::{DepositEvent, DepositReceipt, FaucetError, Reconciliation, TokenFaucet};
pub use shared::SharedFaucet;
