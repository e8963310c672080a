//! Participant directory and canonical data feed

use crate::crypto::KeyPair;
use crate::error::{Error, Result};
use crate::types::Address;
use rand::Rng;
use std::collections::BTreeMap;

/// Directory of participants plus the canonical payload feed
///
/// Addresses map to their key pairs; a lexicographically sorted address list
/// supports index-based lookup and random pair sampling. The feed is the
/// externally known, ordered sequence of payloads that verification checks
/// transactions against, across the whole ledger.
#[derive(Debug, Default)]
pub struct Context {
    keys: BTreeMap<Address, KeyPair>,
    addresses: Vec<Address>,
    feed: Vec<Vec<u8>>,
}

impl Context {
    /// Empty directory with no feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant; re-registering replaces the credential
    pub fn register(&mut self, address: Address, keypair: KeyPair) {
        self.keys.insert(address, keypair);
        // BTreeMap iteration order keeps the sampling list sorted
        self.addresses = self.keys.keys().cloned().collect();
    }

    /// Install the canonical ordered payload feed
    pub fn set_feed(&mut self, feed: impl IntoIterator<Item = Vec<u8>>) {
        self.feed = feed.into_iter().collect();
    }

    /// Number of registered addresses
    pub fn address_count(&self) -> usize {
        self.addresses.len()
    }

    /// Address at `index` in the sorted address list
    pub fn address_at(&self, index: usize) -> Result<&Address> {
        self.addresses.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.addresses.len(),
        })
    }

    /// Two distinct addresses drawn uniformly at random
    ///
    /// The second draw is repeated until it differs from the first.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two addresses are registered.
    pub fn random_address_pair(&self) -> (Address, Address) {
        assert!(
            self.addresses.len() >= 2,
            "address pair sampling requires at least two registered addresses"
        );

        let len = self.addresses.len();
        let mut rng = rand::thread_rng();
        let from = rng.gen_range(0..len);
        let to = loop {
            let candidate = rng.gen_range(0..len);
            if candidate != from {
                break candidate;
            }
        };

        (self.addresses[from].clone(), self.addresses[to].clone())
    }

    /// Key pair registered for `address`
    ///
    /// Absence is not an error here; callers decide whether it is fatal.
    pub fn credential_for(&self, address: &Address) -> Option<&KeyPair> {
        self.keys.get(address)
    }

    /// Payload expected at feed `position`, if the feed extends that far
    pub fn expected_payload_at(&self, position: usize) -> Option<&[u8]> {
        self.feed.get(position).map(Vec::as_slice)
    }

    /// Length of the canonical feed
    pub fn feed_len(&self) -> usize {
        self.feed.len()
    }
}
