//! # Wire Codec
//!
//! The byte-level machinery for the Zephyr wire format: a bounds-checked
//! big-endian reader/writer pair ([`buffer`]) and the polymorphic type
//! registry ([`registry`]) that maps 4-byte wire identifiers to concrete
//! variants.
//!
//! ## Format rules
//!
//! - Every multi-byte integer is big-endian. No exceptions.
//! - Every polymorphic value is preceded by its 4-byte type identifier,
//!   except where a parent's codec version already disambiguates.
//! - Versioned payloads (UTXOs, transactions) start with a 2-byte codec
//!   version so the format can evolve without breaking old parsers.
//!
//! ## Failure discipline
//!
//! Decoding errors are never recovered locally. A partially-parsed
//! polymorphic structure cannot be safely completed, so every decode path
//! propagates a [`CodecError`] straight to the caller, carrying the field
//! name and offset diagnostics a human needs to debug a malformed stream.

pub mod buffer;
pub mod registry;

pub use buffer::{ByteReader, ByteWriter};
pub use registry::WireType;

use thiserror::Error;

/// Errors produced while encoding or decoding wire bytes.
///
/// Each variant names the field being processed at the time of failure —
/// these are parse-time diagnostics, so "which field, at which offset,
/// expecting how many bytes" is the whole point.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// A 4-byte wire type identifier that no known variant owns.
    ///
    /// The registry mapping is total over the identifiers the protocol
    /// defines; anything else fails here. There is no default fallback.
    #[error("unknown type id {type_id} while decoding {field}")]
    UnknownTypeId {
        /// The field whose type identifier was being resolved.
        field: &'static str,
        /// The identifier read from the wire.
        type_id: u32,
    },

    /// An attempted read past the declared buffer length.
    ///
    /// Never silently truncated: a short buffer means the payload is
    /// malformed, and completing the parse would fabricate data.
    #[error("read past end of buffer while decoding {field}: offset {offset}, wanted {wanted}, remaining {remaining}")]
    Offset {
        /// The field being read when the buffer ran out.
        field: &'static str,
        /// Byte offset at which the read started.
        offset: usize,
        /// Number of bytes the read required.
        wanted: usize,
        /// Number of bytes actually remaining.
        remaining: usize,
    },

    /// A codec version this crate does not speak.
    #[error("unsupported codec version {version} while decoding {field}")]
    UnsupportedCodecVersion {
        /// The payload whose version tag was rejected.
        field: &'static str,
        /// The version read from the wire.
        version: u16,
    },

    /// A variable-length field whose declared length exceeds its bound.
    #[error("{field} too long: {len} bytes exceeds maximum {max}")]
    FieldTooLong {
        /// The offending field.
        field: &'static str,
        /// Declared length.
        len: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// Bytes left over after a payload that should have consumed the
    /// whole buffer. Trailing garbage means the caller framed the
    /// payload wrong, and we refuse to paper over that.
    #[error("{remaining} trailing bytes after decoding {field}")]
    TrailingBytes {
        /// The payload that finished early.
        field: &'static str,
        /// Number of unconsumed bytes.
        remaining: usize,
    },
}
