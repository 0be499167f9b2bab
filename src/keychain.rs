//! # Keychain
//!
//! Local Ed25519 key management: keypairs, address derivation, and an
//! in-memory [`Signer`] implementation.
//!
//! Addresses are the first 20 bytes of SHA-256 over the public key —
//! the same truncation the account chain uses, so one keypair spends on
//! both chains.
//!
//! Private keys are zeroized on drop (ed25519-dalek does this), never
//! serialized implicitly, and never logged. If you add logging to this
//! module, log addresses.

use std::collections::HashMap;

use ed25519_dalek::{Signer as DalekSigner, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::constants::ADDRESS_LENGTH;
use crate::ids::Address;
use crate::transaction::{Signature, Signer, SignerError};

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// An Ed25519 keypair and the address derived from its public half.
///
/// Deliberately not `Serialize`/`Deserialize`: exporting key material
/// should be an explicit act, not something a stray JSON encoder does.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generates a fresh keypair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Builds a keypair deterministically from a 32-byte seed. In
    /// Ed25519 the seed is the secret key; feed it from a proper KDF.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// The public verification key.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The address: first [`ADDRESS_LENGTH`] bytes of SHA-256 over the
    /// public key.
    pub fn address(&self) -> Address {
        let digest = Sha256::digest(self.public_key().as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Address::from_bytes(bytes)
    }

    /// Signs an arbitrary message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from_bytes(self.signing_key.sign(message).to_bytes())
    }
}

// ---------------------------------------------------------------------------
// Keychain
// ---------------------------------------------------------------------------

/// A bag of keypairs, indexed by address.
#[derive(Default)]
pub struct Keychain {
    keys: HashMap<Address, Keypair>,
}

impl Keychain {
    /// Creates an empty keychain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keypair, returning its address. A keypair added twice
    /// simply replaces itself.
    pub fn add(&mut self, keypair: Keypair) -> Address {
        let address = keypair.address();
        self.keys.insert(address, keypair);
        address
    }

    /// Generates a fresh keypair, stores it, and returns its address.
    pub fn generate(&mut self) -> Address {
        self.add(Keypair::generate())
    }

    /// Whether the keychain controls `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.keys.contains_key(address)
    }

    /// Every controlled address, sorted.
    pub fn addresses(&self) -> Vec<Address> {
        let mut out: Vec<Address> = self.keys.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Number of keypairs held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// `true` when no keypairs are held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Signer for Keychain {
    fn sign(&self, message: &[u8], address: &Address) -> Result<Signature, SignerError> {
        let keypair = self
            .keys
            .get(address)
            .ok_or(SignerError::UnknownAddress { address: *address })?;
        Ok(keypair.sign(message))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
