//! Content addressing for blocks and transactions
//!
//! All digests are Keccak-256 (the original Keccak padding, not SHA3-256)
//! over a deterministic text serialization:
//!
//! - Numeric fields (indices, epoch-millisecond timestamps) are rendered as
//!   15-digit zero-padded decimal strings, never as raw binary, so preimages
//!   stay stable across platforms and readable in a debugger.
//! - Digests and signatures enter preimages as lowercase hex.
//! - A block preimage is `index ‖ timestamp ‖ previous_hash ‖ tx hashes` in
//!   transaction order; a transaction preimage is `index ‖ from ‖ to ‖
//!   signature ‖ data`.
//! - A record block (single-payload chain) hashes its raw payload text in
//!   place of the transaction hashes. The two schemes are intentionally
//!   separate.

use crate::error::{Error, Result};
use crate::types::{Address, Signature, Transaction};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Width of zero-padded numeric fields in preimages
const PAD_WIDTH: usize = 15;

/// A 256-bit content digest
///
/// Renders as a 64-character lowercase hex string; the all-zero value is the
/// genesis sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The all-zero sentinel used by genesis blocks
    pub const ZERO: Hash = Hash([0u8; 32]);

    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering (64 characters)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string
    pub fn from_hex(text: &str) -> Result<Self> {
        let decoded = hex::decode(text)?;
        let bytes: [u8; 32] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| Error::Encoding(format!("expected 32 bytes, got {}", v.len())))?;
        Ok(Self(bytes))
    }

    /// Whether this is the genesis sentinel
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({}..)", &self.to_hex()[..8])
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Hash::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Digest arbitrary bytes with Keccak-256
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Append a numeric field as 15 zero-padded decimal digits
fn push_padded(preimage: &mut Vec<u8>, value: impl fmt::Display) {
    preimage.extend_from_slice(format!("{value:0width$}", width = PAD_WIDTH).as_bytes());
}

/// Hash of an authorized transaction
///
/// Preimage: `index ‖ from ‖ to ‖ signature ‖ data`, numeric fields padded,
/// signature as hex.
pub fn transaction_hash(
    index: u32,
    from: &Address,
    to: &Address,
    signature: &Signature,
    data: &[u8],
) -> Hash {
    let mut preimage = Vec::new();
    push_padded(&mut preimage, index);
    preimage.extend_from_slice(from.as_str().as_bytes());
    preimage.extend_from_slice(to.as_str().as_bytes());
    preimage.extend_from_slice(signature.to_hex().as_bytes());
    preimage.extend_from_slice(data);
    keccak256(&preimage)
}

/// Hash of a committed block
///
/// Preimage: `index ‖ timestamp ‖ previous_hash ‖ hash(tx 0) ‖ hash(tx 1) ‖ …`
/// with transaction order preserved.
pub fn block_hash(
    index: u64,
    timestamp_millis: i64,
    previous_hash: &Hash,
    transactions: &[Transaction],
) -> Hash {
    let mut preimage = Vec::new();
    push_padded(&mut preimage, index);
    push_padded(&mut preimage, timestamp_millis);
    preimage.extend_from_slice(previous_hash.to_hex().as_bytes());
    for transaction in transactions {
        preimage.extend_from_slice(transaction.hash.to_hex().as_bytes());
    }
    keccak256(&preimage)
}

/// Hash of a single-payload record block
///
/// Preimage: `index ‖ timestamp ‖ previous_hash ‖ data`. The raw payload is
/// hashed directly; this scheme belongs to the record chain only.
pub fn record_hash(index: u64, timestamp_millis: i64, previous_hash: &Hash, data: &str) -> Hash {
    let mut preimage = Vec::new();
    push_padded(&mut preimage, index);
    push_padded(&mut preimage, timestamp_millis);
    preimage.extend_from_slice(previous_hash.to_hex().as_bytes());
    preimage.extend_from_slice(data.as_bytes());
    keccak256(&preimage)
}
