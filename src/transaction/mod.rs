//! # Transactions
//!
//! Construction and signing of platform-chain transactions.
//!
//! ```text
//! base.rs    — BaseTx envelope, Transaction enum, IDs, conservation math
//! signing.rs — Signature/Credential wire types, the Signer seam, SignedTx
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Plan** — [`UtxoSet::minimum_spendable`](crate::utxo_set::UtxoSet::minimum_spendable)
//!    picks inputs and outputs.
//! 2. **Build** — [`BaseTx::new`] validates the envelope limits.
//! 3. **Sign** — [`sign`] drives a [`Signer`] once per input slot.
//! 4. **Broadcast** — [`SignedTx::to_bytes`] is what goes over the wire;
//!    submission itself is out of scope here.
//!
//! The transaction ID is SHA-256 over the unsigned serialization, so it
//! is stable across signing and every party computes the same one.

pub mod base;
pub mod signing;

pub use base::{BaseTx, Transaction, TransactionError};
pub use signing::{sign, signing_message, Credential, Signature, SignedTx, Signer, SignerError};
