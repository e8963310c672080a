//! Error types for the chain

use thiserror::Error;

/// Result type for chain operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chain errors
///
/// Verification variants report the position of the failing block in the
/// walked sequence (the stored index may itself be the corrupted value).
#[derive(Error, Debug)]
pub enum Error {
    /// Address not registered in the credential directory
    #[error("Address not registered: {0}")]
    UnresolvedAddress(String),

    /// Credential could not be used for signing (bad passphrase, bad bytes)
    #[error("Credential error: {0}")]
    Credential(String),

    /// Transaction has an empty required field
    #[error("Malformed transaction {index} in block {block}: empty {field}")]
    MalformedTransaction {
        /// Position of the block in the chain
        block: u64,
        /// Position of the transaction within the block
        index: u32,
        /// Name of the empty field
        field: &'static str,
    },

    /// Transaction payload does not match the canonical data feed
    #[error("Transaction {index} in block {block} does not carry the payload expected at feed position {position}")]
    DataMismatch {
        /// Position of the block in the chain
        block: u64,
        /// Position of the transaction within the block
        index: u32,
        /// Position in the canonical data feed that failed to match
        position: usize,
    },

    /// Signature does not verify against the payload
    #[error("Signature verification failed for transaction {index} in block {block}")]
    SignatureInvalid {
        /// Position of the block in the chain
        block: u64,
        /// Position of the transaction within the block
        index: u32,
    },

    /// Recomputed hash differs from the stored hash
    #[error("Stored hash does not match recomputed hash in block {block}")]
    HashMismatch {
        /// Position of the block in the chain
        block: u64,
        /// Failing transaction within the block, if transaction-level
        transaction: Option<u32>,
    },

    /// Previous-hash link does not match the preceding block
    #[error("Chain link broken at block {block}")]
    ChainBroken {
        /// Position of the block whose link failed
        block: u64,
    },

    /// Genesis block is missing or malformed
    #[error("Invalid genesis block: {0}")]
    InvalidGenesis(&'static str),

    /// Block carries no transactions
    #[error("Block {block} contains no transactions")]
    EmptyBlock {
        /// Position of the offending block
        block: u64,
    },

    /// Directory index out of bounds
    #[error("Index {index} out of range for {len} registered addresses")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of registered addresses
        len: usize,
    },

    /// Pending block was already committed
    #[error("Pending block has already been committed")]
    DoubleCommit,

    /// The ledger behind a pending block has been dropped
    #[error("Ledger is no longer reachable from this pending block")]
    LedgerDetached,

    /// Invalid hex while decoding a digest or signature
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::Encoding(err.to_string())
    }
}
