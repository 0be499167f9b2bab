//! Signing the envelope: credentials, the signer seam, and the signed
//! transaction.
//!
//! Signing is a separate step from building because the keys may not be
//! local (hardware wallet, remote signer). The seam is the [`Signer`]
//! trait: given the 32-byte signing message and an address, produce a
//! signature or say you can't. [`sign`] drives it once per input, in
//! input order, with signature slots filled in [`SigIdx`] order — the
//! remote verifier checks positionally, so order is correctness, not
//! style.
//!
//! The signing message is SHA-256 over [`Transaction::unsigned_bytes`].
//! Credentials are appended after the unsigned serialization and never
//! feed back into the transaction ID.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::codec::{ByteReader, ByteWriter, CodecError, WireType};
use crate::constants::{MAX_TX_INPUTS, SIGNATURE_LENGTH};
use crate::ids::Address;
use crate::input::SigIdx;
use crate::transaction::base::Transaction;

/// Errors from the signing seam.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The signer holds no key for the requested address.
    #[error("no key available for address {address}")]
    UnknownAddress {
        /// The address no key was found for.
        address: Address,
    },
}

/// Anything that can produce a signature for an address it controls.
///
/// Implementations: [`Keychain`](crate::keychain::Keychain) for local
/// in-memory keys; remote or hardware signers slot in the same way.
pub trait Signer {
    /// Signs `message` with the key behind `address`.
    fn sign(&self, message: &[u8], address: &Address) -> Result<Signature, SignerError>;
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// An Ed25519 signature. 64 bytes, deterministic for a given key and
/// message.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly
/// [`SIGNATURE_LENGTH`] bytes — the constructors guarantee it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    bytes: Vec<u8>,
}

impl Signature {
    /// Wraps a raw 64-byte signature.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex form, for logs and JSON payloads.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}…)", &self.to_hex()[..8])
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// The ordered signature bundle attached to one input.
///
/// Wire layout: `type_id(4) ‖ count(4) ‖ signature(64)·n`. Signature
/// `i` must verify against the address at the input's `i`-th signature
/// slot; the verifier never searches.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Credential {
    /// Signatures in slot order.
    pub signatures: Vec<Signature>,
}

impl Credential {
    /// Bundles `signatures`, already in slot order.
    pub fn new(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    /// Writes `type_id(4) ‖ count(4) ‖ signatures`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_u32(WireType::Credential.id());
        w.write_u32(self.signatures.len() as u32);
        for signature in &self.signatures {
            w.write_bytes(signature.as_bytes());
        }
    }

    /// Reads `type_id(4) ‖ count(4) ‖ signatures`.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let type_id = r.read_u32("credential.type_id")?;
        match WireType::from_wire(type_id, "credential.type_id")? {
            WireType::Credential => {}
            other => {
                return Err(CodecError::UnknownTypeId {
                    field: "credential.type_id",
                    type_id: other.id(),
                })
            }
        }
        let count = r.read_u32("credential.signature_count")? as usize;
        let mut signatures = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let bytes: [u8; SIGNATURE_LENGTH] = r.read_array("credential.signatures")?;
            signatures.push(Signature::from_bytes(bytes));
        }
        Ok(Self { signatures })
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Signs every input of `tx`, producing one credential per input in
/// input order.
///
/// Each credential's signatures follow the input's [`SigIdx`] order. A
/// missing key aborts the whole signing — a partially signed envelope
/// is rejected on-chain anyway, so there is no point producing one.
pub fn sign<S: Signer>(tx: Transaction, signer: &S) -> Result<SignedTx, SignerError> {
    let message = signing_message(&tx);
    let mut credentials = Vec::with_capacity(tx.base().inputs().len());
    for input in tx.base().inputs() {
        let slots: &[SigIdx] = input.input.sig_indices();
        let mut signatures = Vec::with_capacity(slots.len());
        for slot in slots {
            signatures.push(signer.sign(&message, &slot.address)?);
        }
        credentials.push(Credential::new(signatures));
    }
    debug!(
        tx_id = %tx.tx_id(),
        credentials = credentials.len(),
        "transaction signed"
    );
    Ok(SignedTx { tx, credentials })
}

/// The 32-byte message every credential signs: SHA-256 over the
/// unsigned serialization.
pub fn signing_message(tx: &Transaction) -> [u8; 32] {
    let digest = Sha256::digest(tx.unsigned_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

// ---------------------------------------------------------------------------
// SignedTx
// ---------------------------------------------------------------------------

/// An unsigned transaction plus its credentials, ready to broadcast.
///
/// Wire layout: `unsigned_bytes ‖ n_credentials(4) ‖ credentials`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignedTx {
    /// The unsigned envelope. Its hash is the transaction ID, before and
    /// after signing.
    pub tx: Transaction,
    /// One credential per input, in input order.
    pub credentials: Vec<Credential>,
}

impl SignedTx {
    /// `true` when every input has a credential with one signature per
    /// slot. Structural completeness only — cryptographic validity is
    /// the verifier's job.
    pub fn is_fully_signed(&self) -> bool {
        let inputs = self.tx.base().inputs();
        inputs.len() == self.credentials.len()
            && inputs
                .iter()
                .zip(&self.credentials)
                .all(|(input, cred)| input.input.sig_indices().len() == cred.signatures.len())
    }

    /// Serializes `unsigned ‖ n_credentials(4) ‖ credentials`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(256);
        w.write_bytes(&self.tx.unsigned_bytes());
        w.write_u32(self.credentials.len() as u32);
        for credential in &self.credentials {
            credential.write(&mut w);
        }
        w.into_bytes()
    }

    /// Parses a signed serialization, consuming the whole buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let tx = Transaction::read(&mut r)?;
        let count = r.read_u32("signed_tx.credential_count")? as usize;
        if count > MAX_TX_INPUTS {
            return Err(CodecError::FieldTooLong {
                field: "signed_tx.credential_count",
                len: count,
                max: MAX_TX_INPUTS,
            });
        }
        let mut credentials = Vec::with_capacity(count);
        for _ in 0..count {
            credentials.push(Credential::read(&mut r)?);
        }
        r.finish("signed_tx")?;
        Ok(Self { tx, credentials })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
