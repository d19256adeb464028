// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # TCO2 Protocol — Core Primitives
//!
//! The shared vocabulary of the TCO2 faucet workspace. Nothing in here holds
//! custody of anything; these are the types every contract speaks in.
//!
//! ## Architecture
//!
//! - **address** — 20-byte account and contract identities.
//! - **units** — smallest-unit amounts and decimal string conversion.
//! - **token** — the fungible token interface contracts pull funds through.
//! - **config** — protocol constants and well-known addresses.
//!
//! ## Design Philosophy
//!
//! 1. Amounts are integers in the token's smallest unit. Floats never touch
//!    money, not even for display.
//! 2. Every fallible operation returns a typed error. Callers match on
//!    variants, not on strings.
//! 3. Every public type is serializable (serde) so contract state can be
//!    snapshotted to disk.

pub mod address;
pub mod config;
pub mod token;
pub mod units;

pub use address::{Address, AddressError};
pub use token::{FungibleToken, TokenError};
pub use units::{format_units, parse_units, Amount, UnitsError};
