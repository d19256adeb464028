//! # Protocol Configuration & Constants
//!
//! Every magic number in the faucet lives here. The addresses below are the
//! ones the faucet was first exercised against on the Mumbai testnet; they
//! double as defaults for local state files so a fresh `init` looks like the
//! real deployment.

use crate::address::Address;
use crate::units::Amount;

// ---------------------------------------------------------------------------
// Token Parameters
// ---------------------------------------------------------------------------

/// TCO2 tokens use the ERC-20 default of 18 decimals.
pub const TCO2_DECIMALS: u8 = 18;

/// Ticker used when a state file does not name one.
pub const TCO2_SYMBOL: &str = "TCO2";

/// Name used when a state file does not name one.
pub const TCO2_NAME: &str = "Toucan Protocol: TCO2";

/// One whole TCO2 in smallest units.
pub const ONE_TCO2: Amount = 1_000_000_000_000_000_000;

/// TCO2 contract for the Yingpeng HFC23 Decomposition project on Mumbai.
pub const DEFAULT_TCO2_ADDRESS: Address = Address::from_bytes([
    0xa5, 0x83, 0x1e, 0xb6, 0x37, 0xdf, 0xf3, 0x07, 0x39, 0x5b, 0x51, 0x83, 0xc8, 0x6b, 0x04,
    0xc6, 0x9c, 0x51, 0x86, 0x81,
]);

/// Account that held TCO2 at the forked block and deployed the faucet.
pub const DEFAULT_DEPOSITOR_ADDRESS: Address = Address::from_bytes([
    0x72, 0x1f, 0x6f, 0x7a, 0x29, 0xb9, 0x9c, 0xbd, 0xe1, 0xf1, 0x8c, 0x4a, 0xa7, 0xd7, 0xae,
    0xb3, 0x1e, 0xb2, 0x92, 0x3b,
]);

// ---------------------------------------------------------------------------
// Local State
// ---------------------------------------------------------------------------

/// Default path of the CLI state file.
pub const DEFAULT_STATE_FILE: &str = "faucet-state.json";

/// Supply minted to the holder by `init` when none is given, in whole tokens.
pub const DEFAULT_INITIAL_SUPPLY: &str = "5.0";

/// Version tag written into state files. Bump when the layout changes.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Confirmations reported for a deposit applied to local state. Local state
/// has no reorgs, so inclusion is final.
pub const LOCAL_CONFIRMATIONS: u64 = 1;
