//! # UTXO Set
//!
//! An in-memory, indexed collection of UTXOs with address-based lookup,
//! set algebra over UTXO identities, balance computation, and coin
//! selection. This is the accounting half of the library: the codec says
//! what the bytes mean, this module says what you can afford.
//!
//! Two indices, one invariant: the primary map (`UtxoId -> Utxo`) and the
//! secondary address index (`Address -> {UtxoId -> locktime}`) always
//! agree on membership. Every mutation goes through [`UtxoSet::add`] or
//! [`UtxoSet::remove`], which maintain both sides.
//!
//! Persistence is a caller concern — this set is an index, not a store.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, trace};

use crate::ids::{Address, AssetId, UtxoId};
use crate::input::{Input, SigIdx, TransferInput, TransferableInput};
use crate::output::{Output, TransferOutput, TransferableOutput};
use crate::ownership::OutputOwners;
use crate::utxo::Utxo;

/// Wall-clock UNIX seconds, for callers that want "spendable right now"
/// semantics without plumbing their own clock.
pub fn now_seconds() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

// ---------------------------------------------------------------------------
// Merge rules
// ---------------------------------------------------------------------------

/// An unrecognized set-algebra rule name.
///
/// Rule names arrive as strings from RPC parameters and config files;
/// this is where a typo'd rule dies instead of silently unioning.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized merge rule {rule:?}")]
pub struct MergeRuleError {
    /// The rule name that failed to parse.
    pub rule: String,
}

/// The set-algebra operation [`UtxoSet::merge_by_rule`] dispatches on.
///
/// All rules are defined over UTXOID sets; the underlying UTXOs are
/// materialized afterwards. `Self` is the receiver set, `New` the
/// argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Everything in either set.
    Union,
    /// Everything in both sets.
    Intersection,
    /// In the receiver but not the argument.
    DifferenceSelf,
    /// In the argument but not the receiver.
    DifferenceNew,
    /// In exactly one of the two sets.
    SymDifference,
    /// Union, then drop the argument's exclusive members.
    UnionMinusNew,
    /// Union, then drop the receiver's exclusive members.
    UnionMinusSelf,
}

impl FromStr for MergeRule {
    type Err = MergeRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(Self::Union),
            "intersection" => Ok(Self::Intersection),
            "differenceSelf" => Ok(Self::DifferenceSelf),
            "differenceNew" => Ok(Self::DifferenceNew),
            "symDifference" => Ok(Self::SymDifference),
            "unionMinusNew" => Ok(Self::UnionMinusNew),
            "unionMinusSelf" => Ok(Self::UnionMinusSelf),
            other => Err(MergeRuleError {
                rule: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MergeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Union => "union",
            Self::Intersection => "intersection",
            Self::DifferenceSelf => "differenceSelf",
            Self::DifferenceNew => "differenceNew",
            Self::SymDifference => "symDifference",
            Self::UnionMinusNew => "unionMinusNew",
            Self::UnionMinusSelf => "unionMinusSelf",
        };
        write!(f, "{}", name)
    }
}

// ---------------------------------------------------------------------------
// Coin selection types
// ---------------------------------------------------------------------------

/// Errors from coin selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpendError {
    /// The spendable UTXOs cannot cover the requested amount.
    #[error("insufficient funds for asset {asset_id}: required {required}, spendable {available}")]
    InsufficientFunds {
        /// The asset being spent.
        asset_id: AssetId,
        /// The amount requested.
        required: u64,
        /// The total spendable under the given signers.
        available: u64,
    },
}

/// Where a spend goes: target owners, the signers available to authorize
/// inputs, and where change returns.
#[derive(Debug, Clone)]
pub struct SpendDestination {
    /// Addresses receiving the spent amount.
    pub to: Vec<Address>,
    /// Threshold on the destination output.
    pub to_threshold: u32,
    /// Locktime on the destination output. Usually zero.
    pub to_locktime: u64,
    /// Addresses whose keys are available to sign inputs.
    pub signers: Vec<Address>,
    /// Addresses receiving any surplus.
    pub change: Vec<Address>,
    /// Threshold on the change output.
    pub change_threshold: u32,
}

impl SpendDestination {
    /// The common case: one recipient, one change address, single
    /// signatures everywhere, no locktime.
    pub fn simple(to: Address, signers: Vec<Address>, change: Address) -> Self {
        Self {
            to: vec![to],
            to_threshold: 1,
            to_locktime: 0,
            signers,
            change: vec![change],
            change_threshold: 1,
        }
    }
}

/// A fully-populated spend: the inputs to consume and the outputs to
/// emit, ready to drop into a transaction envelope.
#[derive(Debug, Clone)]
pub struct SpendPlan {
    /// Selected inputs, sorted by UTXO identity for a deterministic
    /// envelope. Signature slots are already assigned per signer.
    pub inputs: Vec<TransferableInput>,
    /// The destination output, followed by a change output if there was
    /// a surplus.
    pub outputs: Vec<TransferableOutput>,
    /// The surplus returned to the change owners. Zero when the selected
    /// inputs covered the amount exactly.
    pub change_amount: u64,
}

// ---------------------------------------------------------------------------
// UtxoSet
// ---------------------------------------------------------------------------

/// A mapping `UtxoId -> Utxo` plus an address index for fast "what can
/// these keys spend" queries.
#[derive(Debug, Clone, Default)]
pub struct UtxoSet {
    /// Primary map: every UTXO currently in the set.
    utxos: HashMap<UtxoId, Utxo>,
    /// Secondary index: for each address appearing in an ownership
    /// descriptor, the UTXOs it may (eventually) spend and their
    /// locktimes. Rebuilt incrementally on add/remove.
    index: HashMap<Address, HashMap<UtxoId, u64>>,
}

impl UtxoSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of UTXOs in the set.
    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    /// `true` if the set holds nothing.
    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Membership test by identity.
    pub fn contains(&self, id: &UtxoId) -> bool {
        self.utxos.contains_key(id)
    }

    /// Looks up a UTXO by identity.
    pub fn get(&self, id: &UtxoId) -> Option<&Utxo> {
        self.utxos.get(id)
    }

    /// Iterates over every UTXO, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Utxo> {
        self.utxos.values()
    }

    /// The identities currently present.
    pub fn utxo_ids(&self) -> HashSet<UtxoId> {
        self.utxos.keys().copied().collect()
    }

    /// Every address appearing in the index, sorted.
    pub fn addresses(&self) -> Vec<Address> {
        let mut out: Vec<Address> = self.index.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// The UTXO identities an address appears on, sorted.
    pub fn ids_for_address(&self, address: &Address) -> Vec<UtxoId> {
        let mut out: Vec<UtxoId> = self
            .index
            .get(address)
            .map(|m| m.keys().copied().collect())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Adds a UTXO.
    ///
    /// First write wins: if the identity already exists, the set is left
    /// untouched unless `overwrite` is explicitly set. Returns whether
    /// the set changed.
    pub fn add(&mut self, utxo: Utxo, overwrite: bool) -> bool {
        let id = utxo.utxo_id();
        if self.utxos.contains_key(&id) {
            if !overwrite {
                trace!(utxo_id = %id, "add skipped, identity already present");
                return false;
            }
            // The stored UTXO may index different addresses than the
            // replacement; clear its entries before re-indexing.
            self.remove_by_id(&id);
        }

        let owners = utxo.output().owners();
        for address in owners.addresses() {
            self.index
                .entry(*address)
                .or_default()
                .insert(id, owners.locktime());
        }
        self.utxos.insert(id, utxo);
        trace!(utxo_id = %id, total = self.utxos.len(), "utxo added");
        true
    }

    /// Adds every UTXO from an iterator. Returns how many changed the set.
    pub fn add_all<I: IntoIterator<Item = Utxo>>(&mut self, utxos: I, overwrite: bool) -> usize {
        utxos
            .into_iter()
            .filter(|u| self.add(u.clone(), overwrite))
            .count()
    }

    /// Removes a UTXO.
    ///
    /// Removing an identity that is not present is a no-op reporting
    /// `false` — "nothing removed" is an answer, not an error.
    pub fn remove(&mut self, utxo: &Utxo) -> bool {
        self.remove_by_id(&utxo.utxo_id()).is_some()
    }

    /// Removes by identity, returning the evicted UTXO if there was one.
    pub fn remove_by_id(&mut self, id: &UtxoId) -> Option<Utxo> {
        let utxo = self.utxos.remove(id)?;
        for address in utxo.output().owners().addresses() {
            if let Some(entries) = self.index.get_mut(address) {
                entries.remove(id);
                if entries.is_empty() {
                    self.index.remove(address);
                }
            }
        }
        trace!(utxo_id = %id, total = self.utxos.len(), "utxo removed");
        Some(utxo)
    }

    // -----------------------------------------------------------------------
    // Set algebra
    // -----------------------------------------------------------------------

    /// Materializes a set of identities into a new `UtxoSet`, taking each
    /// UTXO from the receiver if present, otherwise from `other`.
    fn materialize(&self, other: &UtxoSet, ids: impl IntoIterator<Item = UtxoId>) -> UtxoSet {
        let mut out = UtxoSet::new();
        for id in ids {
            if let Some(utxo) = self.get(&id).or_else(|| other.get(&id)) {
                out.add(utxo.clone(), false);
            }
        }
        out
    }

    /// Everything in either set.
    pub fn union(&self, other: &UtxoSet) -> UtxoSet {
        let ids: HashSet<UtxoId> = self.utxo_ids().union(&other.utxo_ids()).copied().collect();
        self.materialize(other, ids)
    }

    /// Everything in both sets.
    pub fn intersection(&self, other: &UtxoSet) -> UtxoSet {
        let ids: HashSet<UtxoId> = self
            .utxo_ids()
            .intersection(&other.utxo_ids())
            .copied()
            .collect();
        self.materialize(other, ids)
    }

    /// In the receiver but not `other`. Directional:
    /// `a.difference(&b)` is not `b.difference(&a)`.
    pub fn difference(&self, other: &UtxoSet) -> UtxoSet {
        let ids: HashSet<UtxoId> = self
            .utxo_ids()
            .difference(&other.utxo_ids())
            .copied()
            .collect();
        self.materialize(other, ids)
    }

    /// In exactly one of the two sets.
    pub fn sym_difference(&self, other: &UtxoSet) -> UtxoSet {
        let ids: HashSet<UtxoId> = self
            .utxo_ids()
            .symmetric_difference(&other.utxo_ids())
            .copied()
            .collect();
        self.materialize(other, ids)
    }

    /// Dispatches to the operation `rule` names.
    pub fn merge_by_rule(&self, other: &UtxoSet, rule: MergeRule) -> UtxoSet {
        debug!(%rule, self_len = self.len(), other_len = other.len(), "merging utxo sets");
        match rule {
            MergeRule::Union => self.union(other),
            MergeRule::Intersection => self.intersection(other),
            MergeRule::DifferenceSelf => self.difference(other),
            MergeRule::DifferenceNew => other.difference(self),
            MergeRule::SymDifference => self.sym_difference(other),
            MergeRule::UnionMinusNew => self.union(other).difference(&other.difference(self)),
            MergeRule::UnionMinusSelf => self.union(other).difference(&self.difference(other)),
        }
    }

    // -----------------------------------------------------------------------
    // Balance & spendability
    // -----------------------------------------------------------------------

    /// Sums the amounts spendable by `addresses` for `asset_id` at
    /// `as_of`.
    ///
    /// A UTXO failing the threshold/locktime check contributes zero; it
    /// is excluded from the sum, not from the set.
    pub fn balance(&self, addresses: &[Address], asset_id: &AssetId, as_of: u64) -> u64 {
        let mut total: u64 = 0;
        for utxo in self.candidates(addresses) {
            if utxo.asset_id() != asset_id {
                continue;
            }
            let output = utxo.output();
            let Some(amount) = output.amount() else {
                continue;
            };
            if output.owners().meets_threshold(addresses, as_of) {
                total = total.saturating_add(amount);
            }
        }
        total
    }

    /// [`balance`](Self::balance) against the wall clock.
    pub fn balance_now(&self, addresses: &[Address], asset_id: &AssetId) -> u64 {
        self.balance(addresses, asset_id, now_seconds())
    }

    /// The distinct UTXOs any of `addresses` appears on, via the
    /// secondary index.
    fn candidates<'a>(&'a self, addresses: &[Address]) -> impl Iterator<Item = &'a Utxo> + 'a {
        let mut ids: HashSet<UtxoId> = HashSet::new();
        for address in addresses {
            if let Some(entries) = self.index.get(address) {
                ids.extend(entries.keys().copied());
            }
        }
        ids.into_iter().filter_map(move |id| self.utxos.get(&id))
    }

    /// Selects a minimal covering set of UTXOs worth at least `amount`
    /// of `asset_id`, spendable by the destination's signers at `as_of`.
    ///
    /// On success the plan carries ready-made inputs (signature slots
    /// assigned per qualifying signer, sorted by UTXO identity) and the
    /// destination output plus a change output for any surplus. On
    /// failure, [`SpendError::InsufficientFunds`] reports how far short
    /// the spendable funds fell.
    pub fn minimum_spendable(
        &self,
        destination: &SpendDestination,
        asset_id: &AssetId,
        amount: u64,
        as_of: u64,
    ) -> Result<SpendPlan, SpendError> {
        // Everything the signers could spend right now, largest first so
        // the covering set stays small. Ties break on identity so the
        // same set always yields the same plan.
        let mut spendable: Vec<&Utxo> = self
            .candidates(&destination.signers)
            .filter(|u| {
                u.asset_id() == asset_id
                    && u.output().amount().is_some_and(|a| a > 0)
                    && u.output()
                        .owners()
                        .meets_threshold(&destination.signers, as_of)
            })
            .collect();
        spendable.sort_unstable_by(|a, b| {
            b.output()
                .amount()
                .cmp(&a.output().amount())
                .then_with(|| a.utxo_id().cmp(&b.utxo_id()))
        });

        let mut selected: Vec<&Utxo> = Vec::new();
        let mut gathered: u64 = 0;
        for &utxo in &spendable {
            if gathered >= amount {
                break;
            }
            gathered = gathered.saturating_add(utxo.output().amount().unwrap_or(0));
            selected.push(utxo);
        }

        if gathered < amount {
            let available: u64 = spendable
                .iter()
                .map(|u| u.output().amount().unwrap_or(0))
                .fold(0u64, u64::saturating_add);
            debug!(
                asset_id = %asset_id,
                required = amount,
                available,
                "coin selection failed"
            );
            return Err(SpendError::InsufficientFunds {
                asset_id: *asset_id,
                required: amount,
                available,
            });
        }

        let mut inputs: Vec<TransferableInput> = Vec::with_capacity(selected.len());
        for utxo in selected {
            let output = utxo.output();
            let owners = output.owners();
            let spenders = owners.spenders(&destination.signers, as_of);
            let mut sig_indices = Vec::with_capacity(spenders.len());
            for spender in &spenders {
                if let Some(index) = owners.address_index(spender) {
                    sig_indices.push(SigIdx::new(index, *spender));
                }
            }
            inputs.push(TransferableInput::new(
                *utxo.tx_id(),
                utxo.output_index(),
                *asset_id,
                Input::Transfer(TransferInput::new(
                    output.amount().unwrap_or(0),
                    sig_indices,
                )),
            ));
        }
        inputs.sort_unstable_by_key(TransferableInput::utxo_id);

        let mut outputs = vec![TransferableOutput::new(
            *asset_id,
            Output::Transfer(TransferOutput::new(
                amount,
                OutputOwners::new(
                    destination.to_locktime,
                    destination.to_threshold,
                    destination.to.clone(),
                ),
            )),
        )];

        let change_amount = gathered - amount;
        if change_amount > 0 {
            outputs.push(TransferableOutput::new(
                *asset_id,
                Output::Transfer(TransferOutput::new(
                    change_amount,
                    OutputOwners::new(0, destination.change_threshold, destination.change.clone()),
                )),
            ));
        }

        debug!(
            asset_id = %asset_id,
            amount,
            change_amount,
            inputs = inputs.len(),
            "coin selection complete"
        );
        Ok(SpendPlan {
            inputs,
            outputs,
            change_amount,
        })
    }

    /// Index-consistency check: every identity in the secondary index
    /// exists in the primary map and vice versa.
    #[cfg(test)]
    fn indices_agree(&self) -> bool {
        for entries in self.index.values() {
            for id in entries.keys() {
                if !self.utxos.contains_key(id) {
                    return false;
                }
            }
        }
        for (id, utxo) in &self.utxos {
            for address in utxo.output().owners().addresses() {
                match self.index.get(address) {
                    Some(entries) if entries.contains_key(id) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADDRESS_LENGTH, ID_LENGTH};
    use crate::ids::TxId;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; ID_LENGTH])
    }

    /// A single-owner UTXO with the given amount and locktime.
    fn utxo(tx_byte: u8, index: u32, owner: Address, amount: u64, locktime: u64) -> Utxo {
        Utxo::new(
            TxId::from_bytes([tx_byte; ID_LENGTH]),
            index,
            asset(0xEE),
            Output::Transfer(TransferOutput::new(
                amount,
                OutputOwners::new(locktime, 1, vec![owner]),
            )),
        )
    }

    const NOW: u64 = 1_700_000_000;

    #[test]
    fn add_and_lookup() {
        let mut set = UtxoSet::new();
        let u = utxo(1, 0, addr(1), 100, 0);
        assert!(set.add(u.clone(), false));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&u.utxo_id()));
        assert_eq!(set.get(&u.utxo_id()), Some(&u));
        assert!(set.indices_agree());
    }

    #[test]
    fn double_add_is_first_write_wins() {
        // Spec scenario 3: adding the same UTXO twice with overwrite=false
        // leaves the set unchanged after the second add.
        let mut set = UtxoSet::new();
        let first = utxo(1, 0, addr(1), 100, 0);
        let second = utxo(1, 0, addr(2), 999, 0); // same identity, new body
        assert!(set.add(first.clone(), false));
        assert!(!set.add(second, false));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&first.utxo_id()), Some(&first));
        assert!(set.indices_agree());
    }

    #[test]
    fn overwrite_replaces_and_reindexes() {
        let mut set = UtxoSet::new();
        let first = utxo(1, 0, addr(1), 100, 0);
        let second = utxo(1, 0, addr(2), 999, 0);
        set.add(first, false);
        assert!(set.add(second.clone(), true));
        assert_eq!(set.get(&second.utxo_id()), Some(&second));
        // The old owner's index entry must be gone.
        assert!(set.ids_for_address(&addr(1)).is_empty());
        assert_eq!(set.ids_for_address(&addr(2)).len(), 1);
        assert!(set.indices_agree());
    }

    #[test]
    fn remove_clears_both_indices() {
        let mut set = UtxoSet::new();
        let u = utxo(1, 0, addr(1), 100, 0);
        set.add(u.clone(), false);
        assert!(set.remove(&u));
        assert!(set.is_empty());
        assert!(set.addresses().is_empty());
        assert!(set.indices_agree());
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set = UtxoSet::new();
        let u = utxo(1, 0, addr(1), 100, 0);
        assert!(!set.remove(&u));
        assert!(set.remove_by_id(&u.utxo_id()).is_none());
    }

    #[test]
    fn multi_owner_utxo_indexes_every_address() {
        let mut set = UtxoSet::new();
        let u = Utxo::new(
            TxId::from_bytes([1; ID_LENGTH]),
            0,
            asset(0xEE),
            Output::Transfer(TransferOutput::new(
                100,
                OutputOwners::new(42, 2, vec![addr(1), addr(2)]),
            )),
        );
        set.add(u.clone(), false);
        assert_eq!(set.addresses(), vec![addr(1), addr(2)]);
        assert_eq!(set.ids_for_address(&addr(1)), vec![u.utxo_id()]);
        set.remove(&u);
        assert!(set.addresses().is_empty());
        assert!(set.indices_agree());
    }

    fn three_sets() -> (UtxoSet, UtxoSet, Utxo, Utxo, Utxo) {
        // Spec scenario 2: A = {u1, u2}, B = {u2, u3}.
        let u1 = utxo(1, 0, addr(1), 10, 0);
        let u2 = utxo(2, 0, addr(1), 20, 0);
        let u3 = utxo(3, 0, addr(1), 30, 0);
        let mut a = UtxoSet::new();
        a.add(u1.clone(), false);
        a.add(u2.clone(), false);
        let mut b = UtxoSet::new();
        b.add(u2.clone(), false);
        b.add(u3.clone(), false);
        (a, b, u1, u2, u3)
    }

    #[test]
    fn union_intersection_difference() {
        let (a, b, u1, u2, _u3) = three_sets();

        let union = a.union(&b);
        assert_eq!(union.len(), 3);

        let inter = a.intersection(&b);
        assert_eq!(inter.len(), 1);
        assert!(inter.contains(&u2.utxo_id()));

        let diff = a.difference(&b);
        assert_eq!(diff.len(), 1);
        assert!(diff.contains(&u1.utxo_id()));
    }

    #[test]
    fn set_algebra_laws() {
        let (a, b, _, _, _) = three_sets();
        assert_eq!(a.union(&b).utxo_ids(), b.union(&a).utxo_ids());
        assert_eq!(a.intersection(&b).utxo_ids(), b.intersection(&a).utxo_ids());
        assert_eq!(
            a.sym_difference(&b).utxo_ids(),
            a.difference(&b).union(&b.difference(&a)).utxo_ids()
        );
        assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn difference_is_directional() {
        let (a, b, u1, _, u3) = three_sets();
        let ab = a.difference(&b);
        let ba = b.difference(&a);
        assert_ne!(ab.utxo_ids(), ba.utxo_ids());
        assert!(ab.contains(&u1.utxo_id()));
        assert!(ba.contains(&u3.utxo_id()));
    }

    #[test]
    fn merge_by_rule_dispatch() {
        let (a, b, _, _, _) = three_sets();
        assert_eq!(a.merge_by_rule(&b, MergeRule::Union).len(), 3);
        assert_eq!(a.merge_by_rule(&b, MergeRule::Intersection).len(), 1);
        assert_eq!(a.merge_by_rule(&b, MergeRule::DifferenceSelf).len(), 1);
        assert_eq!(a.merge_by_rule(&b, MergeRule::DifferenceNew).len(), 1);
        assert_eq!(a.merge_by_rule(&b, MergeRule::SymDifference).len(), 2);
        // Union minus the argument's exclusives is the receiver.
        assert_eq!(
            a.merge_by_rule(&b, MergeRule::UnionMinusNew).utxo_ids(),
            a.utxo_ids()
        );
        // Union minus the receiver's exclusives is the argument.
        assert_eq!(
            a.merge_by_rule(&b, MergeRule::UnionMinusSelf).utxo_ids(),
            b.utxo_ids()
        );
    }

    #[test]
    fn merge_rule_parsing() {
        assert_eq!("union".parse::<MergeRule>().unwrap(), MergeRule::Union);
        assert_eq!(
            "symDifference".parse::<MergeRule>().unwrap(),
            MergeRule::SymDifference
        );
        let err = "frobnicate".parse::<MergeRule>().unwrap_err();
        assert_eq!(err.rule, "frobnicate");
    }

    #[test]
    fn merge_rule_display_roundtrip() {
        for rule in [
            MergeRule::Union,
            MergeRule::Intersection,
            MergeRule::DifferenceSelf,
            MergeRule::DifferenceNew,
            MergeRule::SymDifference,
            MergeRule::UnionMinusNew,
            MergeRule::UnionMinusSelf,
        ] {
            assert_eq!(rule.to_string().parse::<MergeRule>().unwrap(), rule);
        }
    }

    #[test]
    fn balance_sums_spendable_only() {
        // Spec scenario 5: 1,000,000 spendable when unlocked, zero before
        // the locktime.
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 1_000_000, NOW - 100), false);
        let a = asset(0xEE);
        assert_eq!(set.balance(&[addr(1)], &a, NOW), 1_000_000);
        assert_eq!(set.balance(&[addr(1)], &a, NOW - 200), 0);
        // Failing the check excludes from the sum, not from the set.
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn balance_ignores_other_assets_and_owners() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 100, 0), false);
        set.add(utxo(2, 0, addr(2), 50, 0), false);
        let mut other_asset = utxo(3, 0, addr(1), 7, 0);
        other_asset = Utxo::new(
            *other_asset.tx_id(),
            0,
            asset(0xDD),
            other_asset.output().clone(),
        );
        set.add(other_asset, false);

        assert_eq!(set.balance(&[addr(1)], &asset(0xEE), NOW), 100);
        assert_eq!(set.balance(&[addr(1), addr(2)], &asset(0xEE), NOW), 150);
        assert_eq!(set.balance(&[addr(1)], &asset(0xDD), NOW), 7);
    }

    #[test]
    fn balance_respects_threshold() {
        let mut set = UtxoSet::new();
        set.add(
            Utxo::new(
                TxId::from_bytes([1; ID_LENGTH]),
                0,
                asset(0xEE),
                Output::Transfer(TransferOutput::new(
                    500,
                    OutputOwners::new(0, 2, vec![addr(1), addr(2)]),
                )),
            ),
            false,
        );
        assert_eq!(set.balance(&[addr(1)], &asset(0xEE), NOW), 0);
        assert_eq!(set.balance(&[addr(1), addr(2)], &asset(0xEE), NOW), 500);
    }

    fn destination(signers: Vec<Address>) -> SpendDestination {
        SpendDestination::simple(addr(0xD0), signers, addr(0xC0))
    }

    #[test]
    fn spend_exact_amount_no_change() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 100, 0), false);

        let plan = set
            .minimum_spendable(&destination(vec![addr(1)]), &asset(0xEE), 100, NOW)
            .unwrap();
        assert_eq!(plan.inputs.len(), 1);
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.change_amount, 0);
        assert_eq!(plan.outputs[0].output.amount(), Some(100));
    }

    #[test]
    fn spend_with_change() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 300, 0), false);

        let plan = set
            .minimum_spendable(&destination(vec![addr(1)]), &asset(0xEE), 120, NOW)
            .unwrap();
        assert_eq!(plan.change_amount, 180);
        assert_eq!(plan.outputs.len(), 2);
        assert_eq!(plan.outputs[0].output.amount(), Some(120));
        assert_eq!(plan.outputs[1].output.amount(), Some(180));
        assert_eq!(
            plan.outputs[1].output.owners().addresses(),
            &[addr(0xC0)],
            "surplus must go to the change owners"
        );
    }

    #[test]
    fn spend_selects_minimal_covering_set() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 500, 0), false);
        set.add(utxo(2, 0, addr(1), 30, 0), false);
        set.add(utxo(3, 0, addr(1), 20, 0), false);

        // 500 alone covers 400; the small UTXOs stay untouched.
        let plan = set
            .minimum_spendable(&destination(vec![addr(1)]), &asset(0xEE), 400, NOW)
            .unwrap();
        assert_eq!(plan.inputs.len(), 1);
        assert_eq!(plan.inputs[0].input.amount(), Some(500));
    }

    #[test]
    fn spend_assigns_sig_indices_per_signer() {
        let mut set = UtxoSet::new();
        set.add(
            Utxo::new(
                TxId::from_bytes([1; ID_LENGTH]),
                0,
                asset(0xEE),
                Output::Transfer(TransferOutput::new(
                    100,
                    OutputOwners::new(0, 2, vec![addr(1), addr(2), addr(3)]),
                )),
            ),
            false,
        );

        let dest = SpendDestination {
            to: vec![addr(0xD0)],
            to_threshold: 1,
            to_locktime: 0,
            signers: vec![addr(3), addr(1)],
            change: vec![addr(0xC0)],
            change_threshold: 1,
        };
        let plan = set
            .minimum_spendable(&dest, &asset(0xEE), 100, NOW)
            .unwrap();
        let sig_indices = plan.inputs[0].input.sig_indices();
        // Canonical owner order: addr(1) is slot 0, addr(3) is slot 2.
        assert_eq!(sig_indices.len(), 2);
        assert_eq!((sig_indices[0].index, sig_indices[0].address), (0, addr(1)));
        assert_eq!((sig_indices[1].index, sig_indices[1].address), (2, addr(3)));
    }

    #[test]
    fn spend_insufficient_funds() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 40, 0), false);
        set.add(utxo(2, 0, addr(1), 25, 0), false);

        let err = set
            .minimum_spendable(&destination(vec![addr(1)]), &asset(0xEE), 100, NOW)
            .unwrap_err();
        assert_eq!(
            err,
            SpendError::InsufficientFunds {
                asset_id: asset(0xEE),
                required: 100,
                available: 65,
            }
        );
    }

    #[test]
    fn spend_skips_locked_utxos() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 100, NOW + 1_000), false);

        let err = set
            .minimum_spendable(&destination(vec![addr(1)]), &asset(0xEE), 50, NOW)
            .unwrap_err();
        assert!(matches!(
            err,
            SpendError::InsufficientFunds { available: 0, .. }
        ));
    }

    #[test]
    fn spend_is_deterministic() {
        let mut set = UtxoSet::new();
        for i in 0..6u8 {
            set.add(utxo(i + 1, 0, addr(1), 50, 0), false);
        }
        let dest = destination(vec![addr(1)]);
        let p1 = set
            .minimum_spendable(&dest, &asset(0xEE), 120, NOW)
            .unwrap();
        let p2 = set
            .minimum_spendable(&dest, &asset(0xEE), 120, NOW)
            .unwrap();
        let ids1: Vec<UtxoId> = p1.inputs.iter().map(TransferableInput::utxo_id).collect();
        let ids2: Vec<UtxoId> = p2.inputs.iter().map(TransferableInput::utxo_id).collect();
        assert_eq!(ids1, ids2);
        // Inputs arrive sorted by identity.
        let mut sorted = ids1.clone();
        sorted.sort_unstable();
        assert_eq!(ids1, sorted);
    }

    #[test]
    fn clone_is_independent() {
        let mut set = UtxoSet::new();
        set.add(utxo(1, 0, addr(1), 100, 0), false);
        let snapshot = set.clone();
        set.add(utxo(2, 0, addr(1), 50, 0), false);
        assert_eq!(set.len(), 2);
        assert_eq!(snapshot.len(), 1, "clone must not alias the original");
    }
}
