//! # Protocol Constants
//!
//! Every magic number in the Zephyr wire format lives here. The codec is
//! byte-exact against an already-deployed protocol, so these values are not
//! tunables — changing any of them produces transactions the network will
//! reject, or worse, parses foreign bytes into the wrong shape.
//!
//! If you find yourself hardcoding one of these somewhere else, stop and
//! import it instead.

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Mainnet — the real deal. A malformed transaction here costs real money.
pub const NETWORK_ID_MAINNET: u32 = 1;

/// Public testnet — where wallets break things on purpose.
pub const NETWORK_ID_TESTNET: u32 = 5;

/// Local single-node network for development. Reset at will.
pub const NETWORK_ID_LOCAL: u32 = 12345;

/// Returns a friendly name for a network ID, mainly for logging.
/// Unknown networks get the raw number because we don't guess.
pub fn network_name(network_id: u32) -> String {
    match network_id {
        NETWORK_ID_MAINNET => "mainnet".to_string(),
        NETWORK_ID_TESTNET => "testnet".to_string(),
        NETWORK_ID_LOCAL => "local".to_string(),
        other => format!("network-{}", other),
    }
}

// ---------------------------------------------------------------------------
// Codec Version
// ---------------------------------------------------------------------------

/// The codec version this crate speaks. Every versioned payload (UTXO,
/// unsigned transaction, signed transaction) starts with these 2 bytes,
/// big-endian, so parsers can evolve the wire format without breaking
/// older readers.
pub const CODEC_VERSION: u16 = 0;

// ---------------------------------------------------------------------------
// Wire Type Identifiers
// ---------------------------------------------------------------------------
//
// Every polymorphic value on the wire is preceded by a 4-byte big-endian
// type identifier. These numbers are protocol law: they were assigned when
// the network launched and can only grow, never change.

/// The standard transaction envelope.
pub const BASE_TX_TYPE_ID: u32 = 0;

/// An amount-carrying input that spends a prior output.
pub const TRANSFER_INPUT_TYPE_ID: u32 = 5;

/// An amount-carrying output with an ownership descriptor.
pub const TRANSFER_OUTPUT_TYPE_ID: u32 = 7;

/// A credential: the ordered signature bundle attached to one input.
pub const CREDENTIAL_TYPE_ID: u32 = 9;

// ---------------------------------------------------------------------------
// Field Sizes
// ---------------------------------------------------------------------------

/// Length of a raw address in bytes. Addresses are the first 20 bytes of
/// SHA-256 over the public key — same truncation the account chain uses.
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a transaction / asset / blockchain identifier in bytes.
pub const ID_LENGTH: usize = 32;

/// Length of the checksum appended to textual encodings: the last 4 bytes
/// of SHA-256 over the payload.
pub const CHECKSUM_LENGTH: usize = 4;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum memo field length in bytes. Enough for a short annotation,
/// not enough for your novel.
pub const MAX_MEMO_LENGTH: usize = 256;

/// Maximum number of inputs per transaction. Keeps credential lists and
/// signature verification bounded on the validator side.
pub const MAX_TX_INPUTS: usize = 256;

/// Maximum number of outputs per transaction.
pub const MAX_TX_OUTPUTS: usize = 256;
