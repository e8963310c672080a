//! Educational append-only ledger
//!
//! Groups signed, ordered data records into hash-linked blocks. Two chain
//! variants share the crate:
//!
//! - **Batched** ([`Blockchain`]): records are staged in a [`PendingBlock`],
//!   then authorized (credential lookup, Ed25519 signature, Keccak-256
//!   content hash) and appended as one immutable [`Block`].
//! - **Incremental** ([`RecordChain`]): one raw payload per block, hashed
//!   directly, no signatures.
//!
//! # Architecture
//!
//! - **Two-phase commit**: stage freely, then authorize and append atomically
//! - **Parallel authorization**: independent records sign on worker threads,
//!   reassembled in staging order
//! - **Single mutation point**: one write-locked append per ledger
//! - **Independent verification**: every hash and signature is recomputed
//!   from public credentials and the canonical data feed alone
//!
//! # Invariants
//!
//! - Append-only: committed blocks are never modified or removed
//! - Hash-linked: every block stores its predecessor's content hash
//! - Ordered: ledger-wide, payloads follow the canonical feed exactly
//! - Genesis: index 0, zero-sentinel hashes, no transactions
//!
//! # Example
//!
//! ```
//! use chain_core::{
//!     generate_keypair, verify_chain, Address, Blockchain, Context, Ed25519Signer,
//!     Ed25519Verifier,
//! };
//!
//! let mut context = Context::new();
//! for name in ["alice", "bob"] {
//!     context.register(Address::new(name), generate_keypair("hunter2"));
//! }
//! context.set_feed(vec![b"first line".to_vec(), b"second line".to_vec()]);
//!
//! let chain = Blockchain::new();
//! let mut pending = chain.new_pending_block();
//! pending.add_transaction(Address::new("alice"), Address::new("bob"), "first line");
//! pending.add_transaction(Address::new("bob"), Address::new("alice"), "second line");
//! pending.commit(&context, &Ed25519Signer)?;
//!
//! verify_chain(&chain, &context, &Ed25519Verifier)?;
//! # Ok::<(), chain_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod chain;
pub mod context;
pub mod crypto;
pub mod error;
pub mod hash;
pub mod record;
pub mod types;
pub mod verify;

// Re-exports
pub use chain::{Blockchain, PendingBlock, PendingTransaction};
pub use context::Context;
pub use crypto::{
    generate_keypair, Ed25519Signer, Ed25519Verifier, KeyPair, PrivateCredential,
    PublicCredential, Signer, Verifier,
};
pub use error::{Error, Result};
pub use hash::Hash;
pub use record::{verify_records, RecordBlock, RecordChain};
pub use types::{Address, Block, Signature, Transaction};
pub use verify::{verify_blocks, verify_chain};
