//! Core value types for the chain
//!
//! `Block` and `Transaction` are immutable once constructed: hashes are
//! computed at commit time and never recomputed in place. Staging
//! counterparts live in [`crate::chain`].

use crate::hash::Hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Participant identifier, an opaque directory key
///
/// Ordered lexicographically; the credential directory keeps its sampling
/// list sorted by this ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create a new address
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the address is the empty string
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Digital signature over a transaction payload
///
/// Opaque to the chain; only the [`crate::crypto::Verifier`] interprets the
/// bytes. Renders as lowercase hex.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Whether the signature carries no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let preview = if hex.len() > 8 { &hex[..8] } else { &hex };
        write!(f, "Signature({preview}..)")
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        Ok(Signature(bytes))
    }
}

/// An authorized, immutable data record inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position within the containing block, 0-based and contiguous
    pub index: u32,

    /// Sender address; its credential signed this transaction
    pub from: Address,

    /// Recipient address
    pub to: Address,

    /// Signature by the sender credential over `data`
    pub signature: Signature,

    /// Content hash binding index, addresses, signature, and data
    pub hash: Hash,

    /// Opaque payload
    pub data: Vec<u8>,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tx {}: {} -> {} ({} bytes)",
            self.index,
            self.from,
            self.to,
            self.data.len()
        )
    }
}

/// An immutable, hash-linked container of transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain, 0 for genesis, strictly increasing by 1
    pub index: u64,

    /// Hash of the preceding block; the zero sentinel for genesis
    pub previous_hash: Hash,

    /// Content hash of this block, fixed at construction
    pub hash: Hash,

    /// Commit time, milliseconds since the Unix epoch
    pub timestamp_millis: i64,

    /// Authorized transactions in staging order; empty only for genesis
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The genesis block: index 0, sentinel hashes, no transactions
    pub fn genesis(timestamp_millis: i64) -> Self {
        Self {
            index: 0,
            previous_hash: Hash::ZERO,
            hash: Hash::ZERO,
            timestamp_millis,
            transactions: Vec::new(),
        }
    }

    /// Whether this block has the genesis shape
    pub fn is_genesis(&self) -> bool {
        self.index == 0
            && self.hash.is_zero()
            && self.previous_hash.is_zero()
            && self.transactions.is_empty()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "block {} ({} transactions, hash {})",
            self.index,
            self.transactions.len(),
            self.hash
        )
    }
}
