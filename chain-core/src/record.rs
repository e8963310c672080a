//! Single-payload record chain
//!
//! The incremental chain variant: each block carries one raw text payload
//! and is hashed over that payload directly. No transactions, no signatures,
//! no data feed. Its hash scheme is deliberately separate from the batched
//! chain's and the two are never reconciled.

use crate::error::{Error, Result};
use crate::hash::{self, Hash};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record in the single-payload chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBlock {
    /// Position in the chain, 0 for genesis
    pub index: u64,

    /// Append time, milliseconds since the Unix epoch
    pub timestamp_millis: i64,

    /// Hash of the preceding record; the zero sentinel for genesis
    pub previous_hash: Hash,

    /// Content hash over index, timestamp, previous hash, and raw payload
    pub hash: Hash,

    /// Raw text payload; empty only for genesis
    pub data: String,
}

impl fmt::Display for RecordBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.index, self.data)
    }
}

/// Append-only chain of single-payload records
///
/// Single-writer by construction: records are appended one at a time through
/// `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChain {
    blocks: Vec<RecordBlock>,
}

impl RecordChain {
    /// Create a chain holding only the genesis record
    pub fn new() -> Self {
        let genesis = RecordBlock {
            index: 0,
            timestamp_millis: Utc::now().timestamp_millis(),
            previous_hash: Hash::ZERO,
            hash: Hash::ZERO,
            data: String::new(),
        };
        Self {
            blocks: vec![genesis],
        }
    }

    /// Append one record carrying `data`
    pub fn add_record(&mut self, data: impl Into<String>) {
        let data = data.into();
        let previous = self
            .blocks
            .last()
            .expect("record chain always holds a genesis record");

        let index = previous.index + 1;
        let previous_hash = previous.hash;
        let timestamp_millis = Utc::now().timestamp_millis();
        let hash = hash::record_hash(index, timestamp_millis, &previous_hash, &data);

        tracing::debug!("Appending record {}", index);

        self.blocks.push(RecordBlock {
            index,
            timestamp_millis,
            previous_hash,
            hash,
            data,
        });
    }

    /// Committed records, in order
    pub fn blocks(&self) -> &[RecordBlock] {
        &self.blocks
    }

    /// The most recently appended record
    pub fn latest(&self) -> &RecordBlock {
        self.blocks
            .last()
            .expect("record chain always holds a genesis record")
    }

    /// Number of records, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain holds no records
    ///
    /// Never true for a chain built through [`RecordChain::new`].
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for RecordChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify a record chain: genesis shape, content hashes, linkage
pub fn verify_records(chain: &RecordChain) -> Result<()> {
    let blocks = chain.blocks();
    let genesis = blocks
        .first()
        .ok_or(Error::InvalidGenesis("record chain contains no blocks"))?;
    if genesis.index != 0
        || !genesis.hash.is_zero()
        || !genesis.previous_hash.is_zero()
        || !genesis.data.is_empty()
    {
        return Err(Error::InvalidGenesis("record genesis is malformed"));
    }

    for (offset, window) in blocks.windows(2).enumerate() {
        let position = (offset + 1) as u64;
        let (previous, block) = (&window[0], &window[1]);

        let recomputed = hash::record_hash(
            block.index,
            block.timestamp_millis,
            &block.previous_hash,
            &block.data,
        );
        if recomputed != block.hash {
            return Err(Error::HashMismatch {
                block: position,
                transaction: None,
            });
        }
        if block.previous_hash != previous.hash {
            return Err(Error::ChainBroken { block: position });
        }
    }

    Ok(())
}
