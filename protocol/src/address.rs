//! # Addresses
//!
//! A 20-byte identity for accounts and contracts, rendered the way every
//! block explorer renders it: `0x` followed by 40 hex characters.
//!
//! Parsing is case-insensitive and the `0x` prefix is optional, so checksummed
//! addresses copied from a wallet parse to the same value as their lowercase
//! form. Display is always lowercase.

use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing an address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The input is not valid hexadecimal.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    /// The input decoded to the wrong number of bytes.
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account or contract identity.
///
/// The all-zero address is the null identity. Contracts refuse to be
/// configured with it, since anything sent there is unrecoverable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Creates an address from its raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns `true` for the null identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Lowercase hex with the `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses a hex address, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength(bytes.len()));
        }

        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derives a deterministic address from a human label.
    ///
    /// Takes the last 20 bytes of `SHA-256(label)`. Useful for fixtures and
    /// for naming accounts in local state files ("alice", "treasury").
    pub fn from_seed(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Self(arr)
    }

    /// Generates a random, non-zero address.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut arr = [0u8; ADDRESS_LENGTH];
            rng.fill_bytes(&mut arr);
            let addr = Self(arr);
            if !addr.is_zero() {
                return addr;
            }
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

// Serialized as a hex string so addresses can key JSON maps.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TCO2: &str = "0xa5831eb637dff307395b5183c86B04c69C518681";

    #[test]
    fn parses_checksummed_address() {
        let addr: Address = TCO2.parse().unwrap();
        assert_eq!(addr.to_hex(), TCO2.to_lowercase());
    }

    #[test]
    fn parses_without_prefix() {
        let with = Address::from_hex(TCO2).unwrap();
        let without = Address::from_hex(&TCO2[2..]).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            Address::from_hex("0x1234"),
            Err(AddressError::InvalidLength(2))
        );
    }

    #[test]
    fn rejects_non_hex() {
        let result = Address::from_hex("0xzz831eb637dff307395b5183c86b04c69c518681");
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::from_seed("alice").is_zero());
    }

    #[test]
    fn seed_derivation_is_deterministic() {
        assert_eq!(Address::from_seed("alice"), Address::from_seed("alice"));
        assert_ne!(Address::from_seed("alice"), Address::from_seed("bob"));
    }

    #[test]
    fn random_addresses_differ() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::from_hex(TCO2).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", TCO2.to_lowercase()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn address_can_key_a_json_map() {
        let mut map = HashMap::new();
        map.insert(Address::from_seed("alice"), 42u64);
        let json = serde_json::to_string(&map).unwrap();
        let back: HashMap<Address, u64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&Address::from_seed("alice")), Some(&42));
    }
}
