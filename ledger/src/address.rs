//! # Account Addresses
//!
//! Defines the [`Address`] type used for every account, contract, and
//! asset identifier in the Phoenix ledger. An address is an opaque
//! 20-byte value -- the ledger attaches no meaning to its contents
//! beyond equality and the distinguished all-zero value.
//!
//! The all-zero address ([`Address::ZERO`]) is the null identity. It is
//! never a valid recipient, spender, or owner; the validation layer
//! rejects it before any state mutation.
//!
//! Addresses serialize as `0x`-prefixed hex strings. This keeps
//! address-keyed maps representable as plain JSON objects, which the
//! persisted state format relies on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account identifier.
///
/// Addresses are assigned by whatever key-management scheme the host
/// environment uses; the ledger only compares them. Two addresses are the
/// same account if and only if their bytes are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The null identity. Never a valid operation target.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Creates an `Address` from raw bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 20-byte identifier.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns `true` if this is the all-zero null identity.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Returns the `0x`-prefixed hex encoding of this address.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parses a hex-encoded address. The `0x` prefix is optional.
    ///
    /// # Errors
    ///
    /// Returns [`hex::FromHexError`] if the input is not valid hex or
    /// does not decode to exactly 20 bytes.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        if bytes.len() != ADDRESS_LENGTH {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}...)", &self.to_hex()[..10])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Serialize as a hex string rather than a byte array so that
// `HashMap<Address, _>` becomes a plain JSON object.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1u8; 20]).is_zero());
    }

    #[test]
    fn hex_roundtrip() {
        let addr = Address::from_bytes([0xAB; 20]);
        let hex_str = addr.to_hex();
        assert!(hex_str.starts_with("0x"));
        assert_eq!(Address::from_hex(&hex_str).unwrap(), addr);
    }

    #[test]
    fn from_hex_accepts_unprefixed() {
        let addr = Address::from_bytes([0x42; 20]);
        let bare = hex::encode(addr.as_bytes());
        assert_eq!(Address::from_hex(&bare).unwrap(), addr);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(Address::from_hex("0x1234").is_err());
        assert!(Address::from_hex(&"ff".repeat(32)).is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        assert!(Address::from_hex(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn from_str_parses() {
        let addr: Address = Address::from_bytes([7u8; 20]).to_hex().parse().unwrap();
        assert_eq!(addr, Address::from_bytes([7u8; 20]));
    }

    #[test]
    fn serializes_as_hex_string() {
        let addr = Address::from_bytes([0x11; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));

        let recovered: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, addr);
    }

    #[test]
    fn address_keyed_map_serializes_to_json_object() {
        let mut map = HashMap::new();
        map.insert(Address::from_bytes([1u8; 20]), 100u128);

        let json = serde_json::to_string(&map).unwrap();
        let recovered: HashMap<Address, u128> = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, map);
    }
}
