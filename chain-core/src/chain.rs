//! Ledger, staging, and the two-phase commit protocol
//!
//! A [`Blockchain`] hands out [`PendingBlock`] staging areas. Callers fill a
//! pending block with raw records, then `commit` authorizes every record
//! (credential lookup, signature, content hash) in parallel and appends one
//! immutable [`Block`] atomically. The append under the write lock is the
//! ledger's single mutation point; committed blocks are never touched again.

use crate::context::Context;
use crate::crypto::Signer;
use crate::error::{Error, Result};
use crate::hash;
use crate::types::{Address, Block, Transaction};
use chrono::Utc;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::sync::{Arc, Weak};

/// Append-only chain of hash-linked blocks
///
/// Constructed with its genesis block already in place. Cloning the handle
/// shares the same underlying chain.
#[derive(Debug, Clone)]
pub struct Blockchain {
    store: Arc<RwLock<Vec<Block>>>,
}

impl Blockchain {
    /// Create a ledger holding only the genesis block
    pub fn new() -> Self {
        let genesis = Block::genesis(Utc::now().timestamp_millis());
        Self {
            store: Arc::new(RwLock::new(vec![genesis])),
        }
    }

    /// Owned snapshot of the committed blocks, in order
    ///
    /// The read lock is held only for the clone; the snapshot stays
    /// consistent while further commits proceed on the live chain.
    pub fn blocks(&self) -> Vec<Block> {
        self.store.read().clone()
    }

    /// Number of committed blocks, genesis included
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Whether the chain holds no blocks
    ///
    /// Never true for a ledger built through [`Blockchain::new`].
    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Clone of the most recently committed block
    pub fn latest(&self) -> Block {
        self.store
            .read()
            .last()
            .expect("chain always holds a genesis block")
            .clone()
    }

    /// Fresh staging area bound to this ledger
    pub fn new_pending_block(&self) -> PendingBlock {
        PendingBlock {
            store: Arc::downgrade(&self.store),
            transactions: Vec::new(),
            committed: false,
        }
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

/// Append an authorized batch as one new block
///
/// The write lock covers the read-tail/construct/push sequence, so
/// concurrent commits serialize and every block links to the true tail.
fn append_block(store: &RwLock<Vec<Block>>, transactions: Vec<Transaction>) {
    let mut blocks = store.write();
    let previous = blocks.last().expect("chain always holds a genesis block");

    let index = previous.index + 1;
    let previous_hash = previous.hash;
    let timestamp_millis = Utc::now().timestamp_millis();
    let block_hash = hash::block_hash(index, timestamp_millis, &previous_hash, &transactions);

    tracing::debug!(
        "Appending block {} with {} transactions",
        index,
        transactions.len()
    );

    blocks.push(Block {
        index,
        previous_hash,
        hash: block_hash,
        timestamp_millis,
        transactions,
    });
}

/// A staged record awaiting authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Position the record will occupy in its block
    pub index: u32,

    /// Sender address, resolved against the directory at commit time
    pub from: Address,

    /// Recipient address
    pub to: Address,

    /// Opaque payload to be signed
    pub data: Vec<u8>,
}

/// Mutable staging area for one future block
///
/// Holds a non-owning handle to its ledger; committing appends exactly one
/// block. A pending block is one-shot: a second commit after success fails
/// with [`Error::DoubleCommit`], while a failed commit leaves the staging
/// area intact for retry.
#[derive(Debug)]
pub struct PendingBlock {
    store: Weak<RwLock<Vec<Block>>>,
    transactions: Vec<PendingTransaction>,
    committed: bool,
}

impl PendingBlock {
    /// Stage a record; its index is assigned from the current staging length
    ///
    /// No address validation happens here; unresolvable senders surface at
    /// commit time.
    pub fn add_transaction(&mut self, from: Address, to: Address, data: impl Into<Vec<u8>>) {
        let index = self.transactions.len() as u32;
        self.transactions.push(PendingTransaction {
            index,
            from,
            to,
            data: data.into(),
        });
    }

    /// Staged records, in order
    pub fn transactions(&self) -> &[PendingTransaction] {
        &self.transactions
    }

    /// Authorize every staged record and append one block to the ledger
    ///
    /// Authorization resolves each sender credential, signs the payload, and
    /// computes the record hash. It runs across worker threads; the indexed
    /// collect reassembles results in staging order, which the block hash
    /// depends on. Any failure aborts the whole commit without touching the
    /// ledger (all-or-nothing).
    pub fn commit(&mut self, context: &Context, signer: &dyn Signer) -> Result<()> {
        if self.committed {
            return Err(Error::DoubleCommit);
        }

        let store = self.store.upgrade().ok_or(Error::LedgerDetached)?;

        let next_index = store.read().len() as u64;
        if self.transactions.is_empty() {
            return Err(Error::EmptyBlock { block: next_index });
        }

        tracing::debug!(
            "Authorizing {} staged transactions for block {}",
            self.transactions.len(),
            next_index
        );

        let transactions = self
            .transactions
            .par_iter()
            .map(|pending| authorize(pending, context, signer))
            .collect::<Result<Vec<_>>>()?;

        append_block(&store, transactions);
        self.committed = true;
        Ok(())
    }
}

/// Authorize one staged record into an immutable transaction
fn authorize(
    pending: &PendingTransaction,
    context: &Context,
    signer: &dyn Signer,
) -> Result<Transaction> {
    let keypair = context
        .credential_for(&pending.from)
        .ok_or_else(|| Error::UnresolvedAddress(pending.from.to_string()))?;

    let signature = signer.sign(keypair.private(), keypair.passphrase(), &pending.data)?;
    let hash = hash::transaction_hash(
        pending.index,
        &pending.from,
        &pending.to,
        &signature,
        &pending.data,
    );

    Ok(Transaction {
        index: pending.index,
        from: pending.from.clone(),
        to: pending.to.clone(),
        signature,
        hash,
        data: pending.data.clone(),
    })
}
