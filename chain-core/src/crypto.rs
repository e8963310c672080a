//! Credentials and signing
//!
//! This module provides:
//! - Passphrase-locked Ed25519 credentials and key-pair generation
//! - The [`Signer`] and [`Verifier`] contracts consumed by commit and
//!   verification
//! - Default Ed25519 implementations of both contracts
//!
//! Key files, armored encodings, and key persistence are out of scope; a
//! private credential here is the in-memory reduction of a locked key: the
//! raw seed plus a passphrase tag that must match before signing.

use crate::error::{Error, Result};
use crate::types::Signature;
use ed25519_dalek::{
    Signature as DalekSignature, Signer as DalekSigner, SigningKey, Verifier as DalekVerifier,
    VerifyingKey,
};
use sha2::{Digest, Sha256};
use std::fmt;

/// Byte length of an Ed25519 seed
const SEED_LEN: usize = 32;

/// Byte length of the passphrase tag appended to the seed
const TAG_LEN: usize = 32;

/// Private credential: an Ed25519 seed locked behind a passphrase tag
///
/// Layout: 32 seed bytes followed by SHA-256 of the passphrase. A signer
/// refuses to use the seed unless the supplied passphrase digests to the
/// stored tag.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateCredential(Vec<u8>);

impl PrivateCredential {
    /// Wrap raw credential bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw credential bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PrivateCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs
        write!(f, "PrivateCredential(..)")
    }
}

/// Public credential: Ed25519 verifying-key bytes
#[derive(Clone, PartialEq, Eq)]
pub struct PublicCredential(Vec<u8>);

impl PublicCredential {
    /// Wrap raw verifying-key bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw verifying-key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = hex::encode(&self.0);
        let preview = if hex.len() > 8 { &hex[..8] } else { &hex };
        write!(f, "PublicCredential({preview}..)")
    }
}

/// Signing and verification credentials for one participant
#[derive(Clone)]
pub struct KeyPair {
    passphrase: String,
    private: PrivateCredential,
    public: PublicCredential,
}

impl KeyPair {
    /// Assemble a key pair from its parts
    pub fn new(
        passphrase: impl Into<String>,
        private: PrivateCredential,
        public: PublicCredential,
    ) -> Self {
        Self {
            passphrase: passphrase.into(),
            private,
            public,
        }
    }

    /// Passphrase that unlocks the private credential
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    /// Private credential
    pub fn private(&self) -> &PrivateCredential {
        &self.private
    }

    /// Public credential
    pub fn public(&self) -> &PublicCredential {
        &self.public
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Generate a fresh Ed25519 key pair locked behind `passphrase`
pub fn generate_keypair(passphrase: &str) -> KeyPair {
    let seed = rand::random::<[u8; 32]>();
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();

    let mut credential = Vec::with_capacity(SEED_LEN + TAG_LEN);
    credential.extend_from_slice(&seed);
    credential.extend_from_slice(&passphrase_tag(passphrase));

    KeyPair {
        passphrase: passphrase.to_string(),
        private: PrivateCredential(credential),
        public: PublicCredential(verifying_key.to_bytes().to_vec()),
    }
}

fn passphrase_tag(passphrase: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.finalize().into()
}

/// Produces signatures over byte payloads
///
/// Implementations must be `Send + Sync`: commit fans signing out across
/// worker threads.
pub trait Signer: Send + Sync {
    /// Sign `payload` with a private credential unlocked by `passphrase`
    ///
    /// Fails with [`Error::Credential`] when the passphrase does not unlock
    /// the credential or the credential bytes are malformed.
    fn sign(
        &self,
        credential: &PrivateCredential,
        passphrase: &str,
        payload: &[u8],
    ) -> Result<Signature>;
}

/// Checks signatures over byte payloads
pub trait Verifier: Send + Sync {
    /// Whether `signature` verifies over `payload` under `credential`
    fn verify(&self, credential: &PublicCredential, payload: &[u8], signature: &Signature)
        -> bool;
}

/// Default [`Signer`] over Ed25519
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Signer;

impl Signer for Ed25519Signer {
    fn sign(
        &self,
        credential: &PrivateCredential,
        passphrase: &str,
        payload: &[u8],
    ) -> Result<Signature> {
        let bytes = credential.as_bytes();
        if bytes.len() != SEED_LEN + TAG_LEN {
            return Err(Error::Credential(format!(
                "private credential must be {} bytes, got {}",
                SEED_LEN + TAG_LEN,
                bytes.len()
            )));
        }
        if bytes[SEED_LEN..] != passphrase_tag(passphrase) {
            return Err(Error::Credential(
                "passphrase does not unlock this credential".to_string(),
            ));
        }

        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&bytes[..SEED_LEN]);
        let signing_key = SigningKey::from_bytes(&seed);
        Ok(Signature::from_bytes(signing_key.sign(payload).to_bytes()))
    }
}

/// Default [`Verifier`] over Ed25519
///
/// Malformed credential or signature bytes verify as `false`; verification
/// never panics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(
        &self,
        credential: &PublicCredential,
        payload: &[u8],
        signature: &Signature,
    ) -> bool {
        let key_bytes: [u8; 32] = match credential.as_bytes().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let verifying_key = match VerifyingKey::from_bytes(&key_bytes) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature_bytes: [u8; 64] = match signature.as_bytes().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        verifying_key
            .verify(payload, &DalekSignature::from_bytes(&signature_bytes))
            .is_ok()
    }
}
