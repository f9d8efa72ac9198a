//! Open chaining hash set with pooled bins.
//!
//! The caller supplies the hash value and an equality function comparing a probe key
//! against a stored element, so keys that collide on hash are told apart by `eql`.
//! Bins live in an arena addressed by index. Removed bins are recycled onto a free-list
//! threaded through their `next` index instead of being released.

use crate::config::PhysicsConfig;
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::{collections::hash_map, marker::PhantomData};

pub type HashValue = usize;

/// Number of bins allocated at once when the pool is empty.
pub const POOLED_BUFFER_SIZE: usize = 1024;

const HASH_COEF: HashValue = 3344921057;

/// Order independent hash of two hash values.
#[inline]
pub fn hash_pair(a: HashValue, b: HashValue) -> HashValue {
    a.wrapping_mul(HASH_COEF) ^ b.wrapping_mul(HASH_COEF)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct BinIndex(u32);

#[derive(Debug)]
struct HashSetBin<T> {
    // None while the bin sits in the pool
    elt: Option<T>,
    hash: HashValue,
    next: Option<BinIndex>,
}

#[derive(Debug)]
struct BinPool<T> {
    bins: Vec<HashSetBin<T>>,
    pooled: Option<BinIndex>,
    pooled_count: usize,
    batch_size: usize,
}

impl<T> BinPool<T> {
    fn new(batch_size: usize) -> Self {
        Self {
            bins: Vec::new(),
            pooled: None,
            pooled_count: 0,
            batch_size,
        }
    }

    #[inline]
    fn get(&self, index: BinIndex) -> &HashSetBin<T> {
        &self.bins[index.0 as usize]
    }

    #[inline]
    fn get_mut(&mut self, index: BinIndex) -> &mut HashSetBin<T> {
        &mut self.bins[index.0 as usize]
    }

    fn push_bin(&mut self) -> BinIndex {
        let index = BinIndex(self.bins.len() as u32);
        self.bins.push(HashSetBin {
            elt: None,
            hash: 0,
            next: None,
        });
        index
    }

    /// Returns the bin to the pool, handing back the payload it held.
    fn recycle(&mut self, index: BinIndex) -> Option<T> {
        let pooled = self.pooled;
        let bin = self.get_mut(index);
        let elt = bin.elt.take();
        bin.next = pooled;
        self.pooled = Some(index);
        self.pooled_count += 1;
        elt
    }

    fn get_unused_bin(&mut self) -> BinIndex {
        if let Some(index) = self.pooled {
            self.pooled = self.get(index).next;
            self.pooled_count -= 1;
            return index;
        }

        trace!(
            "hash set bin pool empty, allocating {} bins",
            self.batch_size + 1
        );
        self.bins.reserve(self.batch_size + 1);
        for _ in 0..self.batch_size {
            let index = self.push_bin();
            self.recycle(index);
        }

        self.push_bin()
    }

    fn clear(&mut self) {
        self.bins.clear();
        self.pooled = None;
        self.pooled_count = 0;
    }
}

pub struct HashSet<K: ?Sized, T, F>
where
    F: Fn(&K, &T) -> bool,
{
    // number of live bins in the table, not the table size
    entries: usize,
    eql: F,
    default_value: Option<T>,

    table: FxHashMap<HashValue, BinIndex>,
    pool: BinPool<T>,

    _key: PhantomData<fn(&K)>,
}

impl<K: ?Sized, T, F> HashSet<K, T, F>
where
    F: Fn(&K, &T) -> bool,
{
    pub fn new(eql: F) -> Self {
        Self::with_pool_batch_size(eql, POOLED_BUFFER_SIZE)
    }

    pub fn with_config(eql: F, config: &PhysicsConfig) -> Self {
        Self::with_pool_batch_size(eql, config.pool_batch_size)
    }

    pub fn with_pool_batch_size(eql: F, batch_size: usize) -> Self {
        Self {
            entries: 0,
            eql,
            default_value: None,
            table: FxHashMap::default(),
            pool: BinPool::new(batch_size),
            _key: PhantomData,
        }
    }

    /// Value returned by `find` when no element matches.
    pub fn set_default_value(&mut self, value: T) {
        self.default_value = Some(value);
    }

    pub fn count(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of recycled bins waiting in the pool.
    pub fn pooled_count(&self) -> usize {
        self.pool.pooled_count
    }

    fn find_bin(&self, hash: HashValue, key: &K) -> Option<BinIndex> {
        let mut bin = self.table.get(&hash).copied();
        while let Some(index) = bin {
            let b = self.pool.get(index);
            if b.elt.as_ref().is_some_and(|elt| (self.eql)(key, elt)) {
                return Some(index);
            }
            bin = b.next;
        }
        None
    }

    pub fn insert(&mut self, hash: HashValue, key: &K, data: T) -> &mut T {
        self.insert_with(hash, key, data, |_, data| data)
    }

    /// Returns the element matching `key`, creating it with `trans(key, data)` when there
    /// is none. `trans` is not called for an existing element.
    pub fn insert_with<D>(
        &mut self,
        hash: HashValue,
        key: &K,
        data: D,
        trans: impl FnOnce(&K, D) -> T,
    ) -> &mut T {
        let index = match self.find_bin(hash, key) {
            Some(index) => index,
            None => {
                let index = self.pool.get_unused_bin();
                let next = self.table.insert(hash, index);

                let bin = self.pool.get_mut(index);
                bin.hash = hash;
                bin.next = next;

                self.entries += 1;
                index
            }
        };

        // only a freshly linked bin is empty here
        self.pool
            .get_mut(index)
            .elt
            .get_or_insert_with(|| trans(key, data))
    }

    pub fn remove(&mut self, hash: HashValue, key: &K) -> Option<T> {
        let mut prev: Option<BinIndex> = None;
        let mut bin = self.table.get(&hash).copied();

        while let Some(index) = bin {
            let b = self.pool.get(index);
            let next = b.next;

            if b.elt.as_ref().is_some_and(|elt| (self.eql)(key, elt)) {
                match prev {
                    Some(prev) => self.pool.get_mut(prev).next = next,
                    None => match next {
                        Some(next) => {
                            self.table.insert(hash, next);
                        }
                        None => {
                            self.table.remove(&hash);
                        }
                    },
                }

                self.entries -= 1;
                return self.pool.recycle(index);
            }

            prev = bin;
            bin = next;
        }

        None
    }

    pub fn find(&self, hash: HashValue, key: &K) -> Option<&T> {
        self.find_bin(hash, key)
            .and_then(|index| self.pool.get(index).elt.as_ref())
            .or(self.default_value.as_ref())
    }

    pub fn find_mut(&mut self, hash: HashValue, key: &K) -> Option<&mut T> {
        let index = self.find_bin(hash, key)?;
        self.pool.get_mut(index).elt.as_mut()
    }

    pub fn contains(&self, hash: HashValue, key: &K) -> bool {
        self.find_bin(hash, key).is_some()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            heads: self.table.values(),
            bin: None,
            pool: &self.pool,
        }
    }

    pub fn each(&self, visit: impl FnMut(&T)) {
        self.iter().for_each(visit);
    }

    pub fn each_mut(&mut self, mut visit: impl FnMut(&mut T)) {
        for &head in self.table.values() {
            let mut bin = Some(head);
            while let Some(index) = bin {
                let b = self.pool.get_mut(index);
                bin = b.next;
                if let Some(elt) = b.elt.as_mut() {
                    visit(elt);
                }
            }
        }
    }

    /// Removes every element for which `keep` returns false, recycling its bin during the
    /// same pass. Returns the number of removed elements.
    pub fn filter(&mut self, mut keep: impl FnMut(&mut T) -> bool) -> usize {
        let pool = &mut self.pool;
        let mut removed = 0;

        self.table.retain(|_, head| {
            let mut prev: Option<BinIndex> = None;
            let mut bin = Some(*head);

            while let Some(index) = bin {
                // capture next before the bin can be recycled
                let next = pool.get(index).next;

                if pool.get_mut(index).elt.as_mut().is_some_and(&mut keep) {
                    prev = Some(index);
                } else {
                    match prev {
                        Some(prev) => pool.get_mut(prev).next = next,
                        None => {
                            if let Some(next) = next {
                                *head = next;
                            }
                        }
                    }

                    pool.recycle(index);
                    removed += 1;
                }

                bin = next;
            }

            // an emptied chain drops its table slot
            prev.is_some()
        });

        self.entries -= removed;
        removed
    }

    /// Drops every element along with the bin pool.
    pub fn clear(&mut self) {
        debug!(
            "clearing hash set with {} entries and {} bins",
            self.entries,
            self.pool.bins.len()
        );
        self.table.clear();
        self.pool.clear();
        self.entries = 0;
    }

    #[cfg(test)]
    fn check_chains(&self) -> usize {
        let mut live = 0;
        for (&hash, &head) in &self.table {
            let mut bin = Some(head);
            while let Some(index) = bin {
                let b = self.pool.get(index);
                assert_eq!(hash, b.hash);
                assert!(b.elt.is_some());
                live += 1;
                bin = b.next;
            }
        }
        assert_eq!(self.entries, live);
        live
    }
}

pub struct Iter<'a, T> {
    heads: hash_map::Values<'a, HashValue, BinIndex>,
    bin: Option<BinIndex>,
    pool: &'a BinPool<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            match self.bin {
                Some(index) => {
                    let bin = self.pool.get(index);
                    self.bin = bin.next;
                    if let Some(elt) = bin.elt.as_ref() {
                        return Some(elt);
                    }
                }
                None => self.bin = Some(*self.heads.next()?),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{hash_pair, HashSet, HashValue};
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[derive(Clone, Debug, PartialEq)]
    struct Entry {
        key: u32,
        value: i32,
    }

    fn entry_eql(key: &u32, entry: &Entry) -> bool {
        *key == entry.key
    }

    type EntrySet = HashSet<u32, Entry, fn(&u32, &Entry) -> bool>;

    fn entry_set(batch_size: usize) -> EntrySet {
        HashSet::with_pool_batch_size(entry_eql as fn(&u32, &Entry) -> bool, batch_size)
    }

    fn entry(key: u32) -> Entry {
        Entry {
            key,
            value: key as i32 * 10,
        }
    }

    fn sorted_keys(set: &EntrySet) -> Vec<u32> {
        let mut keys: Vec<u32> = set.iter().map(|e| e.key).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn test_single_chain_remove_middle() {
        const H: HashValue = 1;
        let mut set = entry_set(4);
        set.set_default_value(Entry { key: 0, value: -1 });

        for key in [1, 2, 3] {
            set.insert(H, &key, entry(key));
        }
        assert_eq!(3, set.count());

        assert_eq!(Some(entry(2)), set.remove(H, &2));
        assert_eq!(2, set.count());
        assert_eq!(Some(&Entry { key: 0, value: -1 }), set.find(H, &2));
        assert_eq!(Some(&entry(1)), set.find(H, &1));
        assert_eq!(Some(&entry(3)), set.find(H, &3));
        assert_eq!(2, set.check_chains());
    }

    #[test]
    fn test_remove_chain_head_keeps_tail() {
        let mut set = entry_set(4);
        for key in [1, 2, 3] {
            set.insert(7, &key, entry(key));
        }
        // the last insert sits at the head of the chain
        assert_eq!(Some(entry(3)), set.remove(7, &3));
        assert!(set.contains(7, &1));
        assert!(set.contains(7, &2));
        assert_eq!(2, set.check_chains());

        assert_eq!(Some(entry(1)), set.remove(7, &1));
        assert_eq!(Some(entry(2)), set.remove(7, &2));
        assert!(set.is_empty());
        assert_eq!(0, set.check_chains());
    }

    #[test]
    fn test_duplicate_insert_returns_existing() {
        let mut set = entry_set(4);
        set.insert(3, &5, entry(5)).value = 99;

        let mut constructed = false;
        let existing = set.insert_with(3, &5, (), |key, _| {
            constructed = true;
            entry(*key)
        });
        assert_eq!(99, existing.value);
        assert!(!constructed);
        assert_eq!(1, set.count());
    }

    #[test]
    fn test_insert_with_transforms_data() {
        let mut set = entry_set(4);
        let elt = set.insert_with(11, &4, 7, |key, data| Entry {
            key: *key,
            value: data * 2,
        });
        assert_eq!(Entry { key: 4, value: 14 }, *elt);
    }

    #[test]
    fn test_remove_absent() {
        let mut set = entry_set(4);
        set.insert(1, &1, entry(1));
        assert_eq!(None, set.remove(1, &2));
        assert_eq!(None, set.remove(2, &1));
        assert_eq!(1, set.count());
        assert_eq!(None, set.find(2, &1));
    }

    #[test]
    fn test_filter_removes_rejected_elements() {
        let mut set = entry_set(2);
        for key in 0..40 {
            // a handful of shared hashes so chains have several bins
            set.insert((key % 5) as HashValue, &key, entry(key));
        }

        let mut visited = 0;
        let removed = set.filter(|e| {
            visited += 1;
            e.key % 3 != 0
        });
        assert_eq!(40, visited);
        assert_eq!(14, removed);
        assert_eq!(26, set.count());
        assert_eq!(26, set.check_chains());

        let expected: Vec<u32> = (0..40).filter(|k| k % 3 != 0).collect();
        assert_eq!(expected, sorted_keys(&set));

        let mut seen = 0;
        set.each(|_| seen += 1);
        assert_eq!(26, seen);
    }

    #[test]
    fn test_filter_everything_and_reinsert() {
        let mut set = entry_set(2);
        for key in 0..6 {
            set.insert(1, &key, entry(key));
        }
        assert_eq!(6, set.filter(|_| false));
        assert!(set.is_empty());
        assert_eq!(None, set.iter().next());

        set.insert(1, &9, entry(9));
        assert_eq!(vec![9], sorted_keys(&set));
    }

    #[test]
    fn test_each_mut() {
        let mut set = entry_set(4);
        for key in 0..10 {
            set.insert(key as HashValue, &key, entry(key));
        }
        set.each_mut(|e| e.value = -(e.key as i32));
        assert_eq!(Some(&Entry { key: 7, value: -7 }), set.find(7, &7));
        if let Some(e) = set.find_mut(7, &7) {
            e.value = 1;
        }
        assert_eq!(1, set.find(7, &7).map_or(0, |e| e.value));
    }

    #[test]
    fn test_recycled_bins_do_not_leak_payloads() {
        let eql = |key: &u32, e: &Option<Entry>| e.as_ref().map(|e| e.key) == Some(*key);
        let mut set: HashSet<u32, Option<Entry>, _> = HashSet::with_pool_batch_size(eql, 2);

        for key in 0..4 {
            set.insert(0, &key, Some(entry(key)));
        }
        for key in 0..4 {
            assert!(set.remove(0, &key).is_some());
        }
        assert!(set.pooled_count() >= 4);

        // reuse every recycled bin and then some
        for key in 10..20 {
            let elt = set.insert_with(0, &key, (), |_, _| None);
            assert_eq!(None, *elt);
        }
        assert_eq!(10, set.count());
        set.each(|e| assert!(e.is_none()));
    }

    #[test]
    fn test_pool_batches() {
        let mut set = entry_set(3);
        assert_eq!(0, set.pooled_count());
        set.insert(0, &0, entry(0));
        assert_eq!(3, set.pooled_count());
        for key in 1..4 {
            set.insert(0, &key, entry(key));
        }
        assert_eq!(0, set.pooled_count());
        set.remove(0, &2);
        assert_eq!(1, set.pooled_count());
        set.insert(5, &5, entry(5));
        assert_eq!(0, set.pooled_count());

        set.clear();
        assert_eq!(0, set.count());
        assert_eq!(0, set.pooled_count());
        assert!(!set.contains(0, &0));
    }

    #[test]
    fn test_hash_pair_is_symmetric() {
        assert_eq!(hash_pair(3, 9), hash_pair(9, 3));
        assert_ne!(hash_pair(3, 9), hash_pair(3, 10));
    }

    #[test]
    fn test_random_operations_match_model() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        let mut set = entry_set(8);
        let mut model = HashMap::new();

        for _ in 0..2000 {
            let key = rng.gen_range(0..64u32);
            let hash = (key % 7) as HashValue;
            match rng.gen_range(0..10) {
                0..=4 => {
                    let value = set.insert(hash, &key, entry(key)).value;
                    assert_eq!(value, *model.entry(key).or_insert(value));
                }
                5..=7 => assert_eq!(model.remove(&key).is_some(), set.remove(hash, &key).is_some()),
                8 => {
                    let threshold = rng.gen_range(0..64u32);
                    let before = set.count();
                    let removed = set.filter(|e| e.key < threshold);
                    model.retain(|k, _| *k < threshold);
                    assert_eq!(before - removed, model.len());
                }
                _ => assert_eq!(model.contains_key(&key), set.find(hash, &key).is_some()),
            }
            assert_eq!(model.len(), set.count());
        }
        assert_eq!(model.len(), set.check_chains());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(u32),
        Remove(u32),
        Filter(u32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..32u32).prop_map(Op::Insert),
            2 => (0..32u32).prop_map(Op::Remove),
            1 => (1..8u32).prop_map(Op::Filter),
        ]
    }

    proptest! {
        #[test]
        fn prop_count_matches_model(ops in proptest::collection::vec(op_strategy(), 0..200)) {
            let mut set = entry_set(4);
            let mut model: HashMap<u32, Entry> = HashMap::new();
            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let before = set.count();
                        set.insert((key % 3) as HashValue, &key, entry(key));
                        let is_new = model.insert(key, entry(key)).is_none();
                        prop_assert_eq!(before + is_new as usize, set.count());
                    }
                    Op::Remove(key) => {
                        let removed = set.remove((key % 3) as HashValue, &key);
                        prop_assert_eq!(model.remove(&key), removed);
                    }
                    Op::Filter(modulus) => {
                        let removed = set.filter(|e| e.key % modulus != 0);
                        let before = model.len();
                        model.retain(|k, _| k % modulus != 0);
                        prop_assert_eq!(before - model.len(), removed);
                    }
                }
                prop_assert_eq!(model.len(), set.count());
            }

            let mut keys: Vec<u32> = model.keys().copied().collect();
            keys.sort_unstable();
            prop_assert_eq!(keys, sorted_keys(&set));
            prop_assert_eq!(model.len(), set.check_chains());
        }
    }
}
