// Copyright (c) 2026 Zephyr Network Contributors. MIT License.
// See LICENSE for details.

//! # Zephyr Ledger — UTXO Client Library
//!
//! The client-side half of Zephyr's platform chain: a byte-exact wire
//! codec for UTXOs, transactions, and credentials, plus the local
//! accounting needed to spend them — balances, coin selection, and
//! Ed25519 signing.
//!
//! Zephyr runs two ledgers under one set of keys: an account chain for
//! contract execution and a UTXO platform chain for transfers and
//! staking. This crate speaks the platform chain's wire format. It
//! never talks to the network itself; it produces and consumes the
//! bytes that RPC layers ship around.
//!
//! ## Architecture
//!
//! - **constants** — Protocol law: type identifiers, sizes, limits.
//! - **codec** — Big-endian byte reader/writer and the type registry.
//! - **encoding** — Checksummed base-58 textual forms for the boundary.
//! - **ids** — Addresses and 32-byte identifiers, strongly typed.
//! - **ownership** — Who may spend an output: threshold + locktime.
//! - **output / input** — The polymorphic wire values and their
//!   transferable wrappers.
//! - **utxo / utxo_set** — The unspent output and the indexed set:
//!   algebra, balances, coin selection.
//! - **transaction** — The envelope, IDs, and signing.
//! - **keychain** — Local Ed25519 keys and address derivation.
//!
//! ## Design Philosophy
//!
//! 1. The wire format is law. Decode-encode is byte-identical, always.
//! 2. Amounts are `u64` in the smallest unit. No floats near money.
//! 3. Parsers reject what they don't know — unknown type identifiers
//!    are errors, not extension points.
//! 4. If it touches money, it has tests. Plural.

pub mod codec;
pub mod constants;
pub mod encoding;
pub mod ids;
pub mod input;
pub mod keychain;
pub mod output;
pub mod ownership;
pub mod transaction;
pub mod utxo;
pub mod utxo_set;

pub use codec::{ByteReader, ByteWriter, CodecError, WireType};
pub use ids::{Address, AssetId, BlockchainId, TxId, UtxoId};
pub use input::{Input, SigIdx, TransferInput, TransferableInput};
pub use keychain::{Keychain, Keypair};
pub use output::{Output, TransferOutput, TransferableOutput};
pub use ownership::OutputOwners;
pub use transaction::{sign, BaseTx, SignedTx, Transaction};
pub use utxo::Utxo;
pub use utxo_set::{MergeRule, SpendDestination, SpendPlan, UtxoSet};
