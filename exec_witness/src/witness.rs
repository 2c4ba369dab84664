//! The access witness: which leaves were touched, and how.
//!
//! Every stem and every leaf moves through `untouched -> READ -> READ | WRITE`
//! and never back. Gas is charged on each transition, so touching a leaf
//! a second time in the same mode is free.

use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

use ethereum_types::H256;
use log::trace;

use crate::{
    gas::WitnessGasSchedule,
    key::{Stem, TreeKey},
    WitnessError, WitnessResult,
};

bitflags::bitflags! {
    /// How a stem or a leaf was accessed.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct AccessMode: u8 {
        /// Read at least once.
        const READ = 0b01;
        /// Written at least once. Always set together with `READ`.
        const WRITE = 0b10;
    }
}

impl AccessMode {
    fn touched(is_write: bool) -> Self {
        match is_write {
            true => Self::READ | Self::WRITE,
            false => Self::READ,
        }
    }
}

/// Supplies the pre-state value of leaves.
///
/// `None` means the leaf does not exist, which makes its first write a fill.
pub trait LeafReader {
    /// The value of `key` before the witnessed execution.
    fn leaf(&self, key: &TreeKey) -> Option<H256>;
}

impl<T: LeafReader + ?Sized> LeafReader for &T {
    fn leaf(&self, key: &TreeKey) -> Option<H256> {
        (**self).leaf(key)
    }
}

impl LeafReader for BTreeMap<TreeKey, H256> {
    fn leaf(&self, key: &TreeKey) -> Option<H256> {
        self.get(key).copied()
    }
}

impl<S: BuildHasher> LeafReader for HashMap<TreeKey, H256, S> {
    fn leaf(&self, key: &TreeKey) -> Option<H256> {
        self.get(key).copied()
    }
}

/// A pre-state where no leaf exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyLeaves;

impl LeafReader for EmptyLeaves {
    fn leaf(&self, _key: &TreeKey) -> Option<H256> {
        None
    }
}

/// What the witness knows about a touched leaf.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ChunkEntry {
    /// How the leaf was accessed.
    pub mode: AccessMode,
    /// Its pre-state value, read on first touch.
    pub initial: Option<H256>,
}

/// Outcome of [`AccessWitness::try_touch`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Charge {
    /// Gas to deduct. Equal to the available gas when it did not suffice.
    pub consumed: u64,
    /// Full cost of the access.
    pub expected: u64,
}

impl Charge {
    /// Whether the available gas did not cover the access.
    pub fn out_of_gas(&self) -> bool {
        self.consumed < self.expected
    }
}

/// A planned touch, not yet recorded.
struct Transition {
    gas: u64,
    initial: Option<H256>,
}

/// Tracks the stems and leaves touched during execution.
///
/// A transaction runs against a fresh witness, which prices its accesses.
/// The block witness then absorbs it through [`AccessWitness::merge`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessWitness {
    schedule: WitnessGasSchedule,
    branches: BTreeMap<Stem, AccessMode>,
    chunks: BTreeMap<TreeKey, ChunkEntry>,
}

impl AccessWitness {
    /// An empty witness charging according to `schedule`.
    pub fn new(schedule: WitnessGasSchedule) -> Self {
        Self {
            schedule,
            branches: BTreeMap::new(),
            chunks: BTreeMap::new(),
        }
    }

    /// The schedule this witness charges with.
    pub fn schedule(&self) -> &WitnessGasSchedule {
        &self.schedule
    }

    /// Records an access to `key` and returns the gas it costs.
    ///
    /// `reader` is only consulted the first time `key` is touched.
    pub fn touch<R: LeafReader + ?Sized>(
        &mut self,
        key: TreeKey,
        is_write: bool,
        reader: &R,
    ) -> WitnessResult<u64> {
        let transition = self.plan(&key, is_write, reader)?;
        self.record(key, is_write, transition.initial);
        trace!(
            "Touched {} (write: {}), charged {}",
            key,
            is_write,
            transition.gas
        );

        Ok(transition.gas)
    }

    /// Like [`Self::touch`], but only records the access if it costs at most
    /// `available_gas`.
    ///
    /// When it does not, nothing is recorded and all the available gas is
    /// reported as consumed.
    pub fn try_touch<R: LeafReader + ?Sized>(
        &mut self,
        key: TreeKey,
        is_write: bool,
        reader: &R,
        available_gas: u64,
    ) -> WitnessResult<Charge> {
        let transition = self.plan(&key, is_write, reader)?;
        if transition.gas > available_gas {
            trace!(
                "Out of gas touching {}: needs {}, has {}",
                key,
                transition.gas,
                available_gas
            );
            return Ok(Charge {
                consumed: available_gas,
                expected: transition.gas,
            });
        }

        self.record(key, is_write, transition.initial);
        trace!(
            "Touched {} (write: {}), charged {}",
            key,
            is_write,
            transition.gas
        );

        Ok(Charge {
            consumed: transition.gas,
            expected: transition.gas,
        })
    }

    fn plan<R: LeafReader + ?Sized>(
        &self,
        key: &TreeKey,
        is_write: bool,
        reader: &R,
    ) -> WitnessResult<Transition> {
        let branch = self
            .branches
            .get(&key.stem)
            .copied()
            .unwrap_or_else(AccessMode::empty);
        let chunk = self.chunks.get(key);
        let chunk_mode = chunk.map_or_else(AccessMode::empty, |c| c.mode);
        let initial = match chunk {
            Some(c) => c.initial,
            None => reader.leaf(key),
        };

        let mut costs = Vec::with_capacity(5);
        if !branch.contains(AccessMode::READ) {
            costs.push(self.schedule.branch_read_cost);
        }
        if !chunk_mode.contains(AccessMode::READ) {
            costs.push(self.schedule.chunk_read_cost);
        }
        if is_write {
            if !branch.contains(AccessMode::WRITE) {
                costs.push(self.schedule.branch_write_cost);
            }
            if !chunk_mode.contains(AccessMode::WRITE) {
                costs.push(self.schedule.chunk_write_cost);
                if initial.is_none() {
                    costs.push(self.schedule.chunk_fill_cost);
                }
            }
        }

        let gas = costs
            .into_iter()
            .try_fold(0u64, u64::checked_add)
            .ok_or(WitnessError::GasOverflow)?;

        Ok(Transition { gas, initial })
    }

    fn record(&mut self, key: TreeKey, is_write: bool, initial: Option<H256>) {
        let mode = AccessMode::touched(is_write);

        *self
            .branches
            .entry(key.stem)
            .or_insert_with(AccessMode::empty) |= mode;
        self.chunks
            .entry(key)
            .or_insert(ChunkEntry {
                mode: AccessMode::empty(),
                initial,
            })
            .mode |= mode;
    }

    /// Adds the stems and leaves of `other` that `self` has not seen.
    ///
    /// Entries already in `self` are left as they are, and nothing is
    /// charged: pricing happens in the witness of each transaction before
    /// it is merged.
    pub fn merge(&mut self, other: &AccessWitness) {
        for (stem, mode) in other.branches.iter() {
            self.branches.entry(*stem).or_insert(*mode);
        }
        for (key, entry) in other.chunks.iter() {
            self.chunks.entry(*key).or_insert(*entry);
        }
    }

    /// The 32 byte keys of all touched leaves, in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = [u8; 32]> + '_ {
        self.chunks.keys().map(TreeKey::to_bytes)
    }

    /// The touched stems, in ascending order.
    pub fn stems(&self) -> impl Iterator<Item = &Stem> {
        self.branches.keys()
    }

    /// The pre-state value of `key`, which must have been touched.
    pub fn initial_value(&self, key: &TreeKey) -> WitnessResult<Option<H256>> {
        self.chunks
            .get(key)
            .map(|c| c.initial)
            .ok_or(WitnessError::InvariantViolation(*key))
    }

    /// How `key` was accessed. Empty if it was never touched.
    pub fn mode(&self, key: &TreeKey) -> AccessMode {
        self.chunks
            .get(key)
            .map_or_else(AccessMode::empty, |c| c.mode)
    }

    /// How any leaf under `stem` was accessed.
    pub fn branch_mode(&self, stem: &Stem) -> AccessMode {
        self.branches
            .get(stem)
            .copied()
            .unwrap_or_else(AccessMode::empty)
    }

    /// The entry of `key`, if it was touched.
    pub fn entry(&self, key: &TreeKey) -> Option<&ChunkEntry> {
        self.chunks.get(key)
    }

    /// Number of touched leaves.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ethereum_types::H256;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{AccessMode, AccessWitness, Charge, EmptyLeaves};
    use crate::{
        gas::WitnessGasSchedule,
        key::{Stem, TreeKey},
        testing_utils::{common_setup, random_keys},
        WitnessError,
    };

    const BRANCH_READ: u64 = 1900;
    const BRANCH_WRITE: u64 = 3000;
    const CHUNK_READ: u64 = 200;
    const CHUNK_WRITE: u64 = 500;
    const CHUNK_FILL: u64 = 6200;

    fn key(stem: u8, suffix: u8) -> TreeKey {
        TreeKey::new(Stem([stem; 31]), suffix)
    }

    fn existing(keys: &[TreeKey]) -> BTreeMap<TreeKey, H256> {
        keys.iter().map(|k| (*k, H256::repeat_byte(1))).collect()
    }

    #[test]
    fn first_read_charges_branch_and_chunk() {
        common_setup();
        let mut witness = AccessWitness::default();

        assert_eq!(
            witness.touch(key(1, 0), false, &EmptyLeaves).unwrap(),
            BRANCH_READ + CHUNK_READ
        );
        assert_eq!(witness.touch(key(1, 0), false, &EmptyLeaves).unwrap(), 0);
        assert_eq!(
            witness.touch(key(1, 1), false, &EmptyLeaves).unwrap(),
            CHUNK_READ
        );
        assert_eq!(witness.mode(&key(1, 0)), AccessMode::READ);
        assert_eq!(witness.len(), 2);
    }

    #[test]
    fn write_charges_read_first() {
        let reader = existing(&[key(2, 0), key(2, 1)]);
        let mut witness = AccessWitness::default();

        assert_eq!(
            witness.touch(key(2, 0), true, &reader).unwrap(),
            BRANCH_READ + CHUNK_READ + BRANCH_WRITE + CHUNK_WRITE
        );
        assert_eq!(witness.touch(key(2, 0), true, &reader).unwrap(), 0);
        assert_eq!(witness.touch(key(2, 0), false, &reader).unwrap(), 0);

        // The branch was already written.
        assert_eq!(
            witness.touch(key(2, 1), true, &reader).unwrap(),
            CHUNK_READ + CHUNK_WRITE
        );
        assert_eq!(
            witness.mode(&key(2, 1)),
            AccessMode::READ | AccessMode::WRITE
        );
    }

    #[test]
    fn read_then_write_charges_the_difference() {
        let reader = existing(&[key(3, 7)]);
        let mut witness = AccessWitness::default();

        witness.touch(key(3, 7), false, &reader).unwrap();
        assert_eq!(
            witness.touch(key(3, 7), true, &reader).unwrap(),
            BRANCH_WRITE + CHUNK_WRITE
        );
    }

    #[test]
    fn writing_an_absent_leaf_fills_it() {
        let mut witness = AccessWitness::default();

        assert_eq!(
            witness.touch(key(4, 0), true, &EmptyLeaves).unwrap(),
            BRANCH_READ + CHUNK_READ + BRANCH_WRITE + CHUNK_WRITE + CHUNK_FILL
        );
        assert_eq!(witness.initial_value(&key(4, 0)).unwrap(), None);

        // The fill is decided by the cached initial value, not by `reader`.
        let mut witness = AccessWitness::default();
        witness.touch(key(4, 0), false, &EmptyLeaves).unwrap();
        let reader = existing(&[key(4, 0)]);
        assert_eq!(
            witness.touch(key(4, 0), true, &reader).unwrap(),
            BRANCH_WRITE + CHUNK_WRITE + CHUNK_FILL
        );
    }

    #[test]
    fn initial_values_are_cached_on_first_touch() {
        let mut reader = BTreeMap::new();
        reader.insert(key(5, 3), H256::repeat_byte(0xab));
        let mut witness = AccessWitness::default();

        witness.touch(key(5, 3), false, &reader).unwrap();
        reader.insert(key(5, 3), H256::repeat_byte(0xcd));
        witness.touch(key(5, 3), true, &reader).unwrap();

        assert_eq!(
            witness.initial_value(&key(5, 3)).unwrap(),
            Some(H256::repeat_byte(0xab))
        );
        assert_eq!(
            witness.initial_value(&key(5, 4)),
            Err(WitnessError::InvariantViolation(key(5, 4)))
        );
    }

    #[test]
    fn insufficient_budget_records_nothing() {
        let mut witness = AccessWitness::default();

        let charge = witness
            .try_touch(key(6, 0), false, &EmptyLeaves, BRANCH_READ)
            .unwrap();
        assert_eq!(
            charge,
            Charge {
                consumed: BRANCH_READ,
                expected: BRANCH_READ + CHUNK_READ,
            }
        );
        assert!(charge.out_of_gas());
        assert!(witness.is_empty());
        assert_eq!(witness.stems().count(), 0);

        let charge = witness
            .try_touch(key(6, 0), false, &EmptyLeaves, BRANCH_READ + CHUNK_READ)
            .unwrap();
        assert!(!charge.out_of_gas());
        assert_eq!(charge.consumed, BRANCH_READ + CHUNK_READ);
        assert_eq!(witness.len(), 1);
    }

    #[test]
    fn custom_schedule_is_used() {
        let schedule = WitnessGasSchedule {
            branch_read_cost: 1,
            chunk_read_cost: 2,
            ..Default::default()
        };
        let mut witness = AccessWitness::new(schedule);

        assert_eq!(witness.touch(key(7, 0), false, &EmptyLeaves).unwrap(), 3);
        assert_eq!(witness.schedule(), &schedule);
    }

    #[test]
    fn overflowing_charges_are_rejected() {
        let schedule = WitnessGasSchedule {
            branch_read_cost: u64::MAX,
            ..Default::default()
        };
        let mut witness = AccessWitness::new(schedule);

        assert_eq!(
            witness.touch(key(8, 0), false, &EmptyLeaves),
            Err(WitnessError::GasOverflow)
        );
        assert!(witness.is_empty());
    }

    #[test]
    fn keys_are_ordered() {
        let mut witness = AccessWitness::default();
        for k in [key(9, 200), key(1, 5), key(9, 3), key(1, 4)] {
            witness.touch(k, false, &EmptyLeaves).unwrap();
        }

        let keys: Vec<_> = witness.keys().collect();
        assert_eq!(
            keys,
            vec![
                key(1, 4).to_bytes(),
                key(1, 5).to_bytes(),
                key(9, 3).to_bytes(),
                key(9, 200).to_bytes(),
            ]
        );
        assert_eq!(
            witness.stems().collect::<Vec<_>>(),
            vec![&Stem([1; 31]), &Stem([9; 31])]
        );
    }

    #[test]
    fn merge_adds_only_absent_entries() {
        let mut block = AccessWitness::default();
        block.touch(key(1, 0), false, &EmptyLeaves).unwrap();

        let reader = existing(&[key(1, 0)]);
        let mut tx = AccessWitness::default();
        tx.touch(key(1, 0), true, &reader).unwrap();
        tx.touch(key(2, 0), true, &reader).unwrap();

        let before = block.clone();
        block.merge(&tx);

        assert_eq!(block.mode(&key(1, 0)), AccessMode::READ);
        assert_eq!(block.initial_value(&key(1, 0)).unwrap(), None);
        assert_eq!(block.branch_mode(&Stem([1; 31])), AccessMode::READ);
        assert_eq!(block.entry(&key(2, 0)), tx.entry(&key(2, 0)));
        assert_eq!(block.len(), 2);
        assert_eq!(block.schedule(), before.schedule());
    }

    #[test]
    fn merge_never_charges_later_transactions_again() {
        let reader = existing(&[]);
        let mut block = AccessWitness::default();

        let mut tx1 = AccessWitness::default();
        assert_ne!(tx1.touch(key(3, 3), false, &reader).unwrap(), 0);
        block.merge(&tx1);

        // Later transactions start from the block's record.
        let mut tx2 = block.clone();
        assert_eq!(tx2.touch(key(3, 3), false, &reader).unwrap(), 0);
    }

    #[test]
    fn merge_is_idempotent_and_commutative_on_keys() {
        common_setup();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let mut a = AccessWitness::default();
            let mut b = AccessWitness::default();
            for k in random_keys(&mut rng, 30) {
                a.touch(k, rng.gen(), &EmptyLeaves).unwrap();
            }
            for k in random_keys(&mut rng, 30) {
                b.touch(k, rng.gen(), &EmptyLeaves).unwrap();
            }

            let mut ab = a.clone();
            ab.merge(&b);
            let mut ba = b.clone();
            ba.merge(&a);
            assert_eq!(ab.keys().collect::<Vec<_>>(), ba.keys().collect::<Vec<_>>());

            let mut twice = ab.clone();
            twice.merge(&b);
            assert_eq!(twice, ab);

            let mut with_self = a.clone();
            with_self.merge(&a);
            assert_eq!(with_self, a);
        }
    }

    #[test]
    fn merge_is_associative() {
        common_setup();
        let mut rng = StdRng::seed_from_u64(4762);

        for _ in 0..20 {
            let [a, b, c] = std::array::from_fn(|_| {
                let mut w = AccessWitness::default();
                for k in random_keys(&mut rng, 25) {
                    w.touch(k, rng.gen(), &EmptyLeaves).unwrap();
                }
                w
            });

            let mut left = a.clone();
            left.merge(&b);
            left.merge(&c);

            let mut bc = b.clone();
            bc.merge(&c);
            let mut right = a.clone();
            right.merge(&bc);

            assert_eq!(left, right);
        }
    }
}
