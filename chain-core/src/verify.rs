//! Chain verification
//!
//! Walks a committed chain using nothing but public credentials and the
//! canonical data feed: genesis shape, per-transaction field, ordering,
//! signature and hash checks, block hash recomputation, and previous-hash
//! linkage. The feed cursor is passed into and returned from each step, so
//! the ordering check spans the whole ledger without hidden mutable state.

use crate::chain::Blockchain;
use crate::context::Context;
use crate::crypto::Verifier;
use crate::error::{Error, Result};
use crate::hash;
use crate::types::{Block, Transaction};

/// Verify the full chain behind a ledger handle
///
/// Takes an owned snapshot first, so it is safe to call while other handles
/// keep committing.
pub fn verify_chain(chain: &Blockchain, context: &Context, verifier: &dyn Verifier) -> Result<()> {
    verify_blocks(&chain.blocks(), context, verifier)
}

/// Verify an ordered block sequence
///
/// Reports the first failure with its position in the walked sequence. A
/// genesis-only sequence verifies successfully; an empty one does not.
pub fn verify_blocks(blocks: &[Block], context: &Context, verifier: &dyn Verifier) -> Result<()> {
    let genesis = blocks
        .first()
        .ok_or(Error::InvalidGenesis("ledger contains no blocks"))?;
    check_genesis(genesis)?;

    let mut cursor = 0usize;
    for (offset, window) in blocks.windows(2).enumerate() {
        let position = (offset + 1) as u64;
        let (previous, block) = (&window[0], &window[1]);

        cursor = verify_block(block, position, cursor, context, verifier)?;

        if block.previous_hash != previous.hash {
            return Err(Error::ChainBroken { block: position });
        }
    }

    tracing::debug!(
        "Verified {} blocks and {} transactions",
        blocks.len(),
        cursor
    );
    Ok(())
}

fn check_genesis(genesis: &Block) -> Result<()> {
    if genesis.index != 0 {
        return Err(Error::InvalidGenesis("genesis index is not zero"));
    }
    if !genesis.hash.is_zero() || !genesis.previous_hash.is_zero() {
        return Err(Error::InvalidGenesis("genesis hashes are not the zero sentinel"));
    }
    if !genesis.transactions.is_empty() {
        return Err(Error::InvalidGenesis("genesis carries transactions"));
    }
    Ok(())
}

/// Check one block's transactions and content hash; returns the advanced cursor
fn verify_block(
    block: &Block,
    position: u64,
    mut cursor: usize,
    context: &Context,
    verifier: &dyn Verifier,
) -> Result<usize> {
    if block.transactions.is_empty() {
        return Err(Error::EmptyBlock { block: position });
    }

    for (index, transaction) in block.transactions.iter().enumerate() {
        cursor = verify_transaction(transaction, position, index as u32, cursor, context, verifier)?;
    }

    let recomputed = hash::block_hash(
        block.index,
        block.timestamp_millis,
        &block.previous_hash,
        &block.transactions,
    );
    if recomputed != block.hash {
        return Err(Error::HashMismatch {
            block: position,
            transaction: None,
        });
    }

    Ok(cursor)
}

/// Check one transaction; returns the advanced cursor
fn verify_transaction(
    transaction: &Transaction,
    block: u64,
    index: u32,
    cursor: usize,
    context: &Context,
    verifier: &dyn Verifier,
) -> Result<usize> {
    if let Some(field) = empty_field(transaction) {
        return Err(Error::MalformedTransaction { block, index, field });
    }

    // Ordering is ledger-global: every transaction must carry the next
    // payload of the canonical feed. A feed that ran out cannot match.
    if context.expected_payload_at(cursor) != Some(transaction.data.as_slice()) {
        return Err(Error::DataMismatch {
            block,
            index,
            position: cursor,
        });
    }

    let keypair = context
        .credential_for(&transaction.from)
        .ok_or_else(|| Error::UnresolvedAddress(transaction.from.to_string()))?;

    if !verifier.verify(keypair.public(), &transaction.data, &transaction.signature) {
        return Err(Error::SignatureInvalid { block, index });
    }

    let recomputed = hash::transaction_hash(
        transaction.index,
        &transaction.from,
        &transaction.to,
        &transaction.signature,
        &transaction.data,
    );
    if recomputed != transaction.hash {
        return Err(Error::HashMismatch {
            block,
            transaction: Some(index),
        });
    }

    Ok(cursor + 1)
}

/// First empty required field, if any
fn empty_field(transaction: &Transaction) -> Option<&'static str> {
    if transaction.from.is_empty() {
        Some("from")
    } else if transaction.to.is_empty() {
        Some("to")
    } else if transaction.signature.is_empty() {
        Some("signature")
    } else if transaction.data.is_empty() {
        Some("data")
    } else {
        None
    }
}
