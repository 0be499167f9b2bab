//! # Ownership Descriptor
//!
//! [`OutputOwners`] is the reusable spending-authorization unit embedded
//! in every amount-bearing output: a set of addresses, a signature
//! threshold, and a locktime before which nothing can be spent.
//!
//! The address list is canonicalized — sorted ascending by raw bytes and
//! deduplicated — **at construction time**, not at serialization time.
//! Equality, hashing, and the wire encoding all observe the same
//! canonical order, so a descriptor built from shuffled addresses is
//! indistinguishable from one built from sorted addresses. Decoding
//! still re-sorts defensively; bytes from elsewhere may only claim to be
//! canonical.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::{ByteReader, ByteWriter, CodecError};
use crate::constants::ADDRESS_LENGTH;
use crate::ids::Address;

/// Errors from indexed access into a descriptor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OwnershipError {
    /// An address index outside the descriptor's address list.
    #[error("address index {index} out of range: descriptor holds {len} addresses")]
    AddressIndexOutOfRange {
        /// The requested index.
        index: u32,
        /// Number of addresses in the descriptor.
        len: usize,
    },
}

/// Addresses + threshold + locktime: who may spend, how many of them
/// must agree, and from when.
///
/// Immutable in spirit: once embedded in a signed transaction the
/// descriptor never changes. [`add_address`](Self::add_address) exists
/// for the construction phase and preserves the canonical order as it
/// inserts.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "RawOutputOwners")]
pub struct OutputOwners {
    /// UNIX seconds before which this authorization cannot be exercised.
    locktime: u64,
    /// Minimum number of distinct authorized addresses that must co-sign.
    threshold: u32,
    /// Authorized addresses, sorted ascending by raw bytes, no duplicates.
    addresses: Vec<Address>,
}

/// Mirror struct for deserialization: whatever order the source had,
/// the descriptor comes out canonical.
#[derive(Deserialize)]
struct RawOutputOwners {
    locktime: u64,
    threshold: u32,
    addresses: Vec<Address>,
}

impl From<RawOutputOwners> for OutputOwners {
    fn from(raw: RawOutputOwners) -> Self {
        Self::new(raw.locktime, raw.threshold, raw.addresses)
    }
}

impl OutputOwners {
    /// Builds a descriptor, canonicalizing the address list (sort by raw
    /// bytes, drop duplicates).
    pub fn new(locktime: u64, threshold: u32, mut addresses: Vec<Address>) -> Self {
        addresses.sort_unstable();
        addresses.dedup();
        Self {
            locktime,
            threshold,
            addresses,
        }
    }

    /// The locktime in UNIX seconds.
    pub fn locktime(&self) -> u64 {
        self.locktime
    }

    /// The signature threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// The addresses in canonical order.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Adds an address during construction, keeping the canonical order.
    /// Adding an address that is already present is a no-op.
    pub fn add_address(&mut self, address: Address) {
        if let Err(pos) = self.addresses.binary_search(&address) {
            self.addresses.insert(pos, address);
        }
    }

    /// The address at positional slot `index`.
    ///
    /// Signature slots are positional against this list, so an
    /// out-of-range index is a hard error, not a `None`.
    pub fn address_at(&self, index: u32) -> Result<&Address, OwnershipError> {
        self.addresses
            .get(index as usize)
            .ok_or(OwnershipError::AddressIndexOutOfRange {
                index,
                len: self.addresses.len(),
            })
    }

    /// The positional slot of `address`, if it is authorized here.
    pub fn address_index(&self, address: &Address) -> Option<u32> {
        self.addresses
            .binary_search(address)
            .ok()
            .map(|i| i as u32)
    }

    /// Whether `candidates` can spend under this descriptor at `as_of`.
    ///
    /// True iff the locktime has already elapsed (`as_of > locktime`)
    /// **and** at least `threshold` of the candidates are authorized.
    pub fn meets_threshold(&self, candidates: &[Address], as_of: u64) -> bool {
        if as_of <= self.locktime {
            return false;
        }
        self.spenders_unlocked(candidates).len() as u64 >= u64::from(self.threshold)
    }

    /// The qualifying subset of `candidates`, in this descriptor's
    /// canonical address order, capped at `threshold` entries.
    ///
    /// Returns empty if the locktime has not elapsed. The cap is an
    /// early exit: once enough qualifying addresses are found the scan
    /// stops, so later candidates are never examined.
    pub fn spenders(&self, candidates: &[Address], as_of: u64) -> Vec<Address> {
        if as_of <= self.locktime {
            return Vec::new();
        }
        self.spenders_unlocked(candidates)
    }

    fn spenders_unlocked(&self, candidates: &[Address]) -> Vec<Address> {
        let mut out = Vec::new();
        for address in &self.addresses {
            if out.len() as u64 >= u64::from(self.threshold) {
                break;
            }
            if candidates.contains(address) {
                out.push(*address);
            }
        }
        out
    }

    /// Writes the descriptor's wire fields:
    /// `locktime(8) ‖ threshold(4) ‖ count(4) ‖ addresses(20·n)`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_u64(self.locktime);
        w.write_u32(self.threshold);
        w.write_u32(self.addresses.len() as u32);
        for address in &self.addresses {
            w.write_bytes(address.as_bytes());
        }
    }

    /// Reads the descriptor's wire fields, re-sorting defensively.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let locktime = r.read_u64("owners.locktime")?;
        let threshold = r.read_u32("owners.threshold")?;
        let count = r.read_u32("owners.address_count")? as usize;
        let mut addresses = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let bytes: [u8; ADDRESS_LENGTH] = r.read_array("owners.addresses")?;
            addresses.push(Address::from_bytes(bytes));
        }
        Ok(Self::new(locktime, threshold, addresses))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
