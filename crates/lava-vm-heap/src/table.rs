//! Fixed-capacity open addressing over a word region
//!
//! A table region is `rows` key/value word pairs. A zero key marks an empty row.
//! The home row of a key is `key % rows`, each miss moves one row forward with
//! wraparound, and the search gives up after `probe_budget` rows (the first one
//! included). There is no resize: when the budget runs out an insert is
//! dropped and a lookup misses, even if other rows are still free.

use lava_vm_core::Ident;
use std::marker::PhantomData;

use crate::cell::Ref;

/// A value that occupies exactly one word of a table row
pub trait TableWord: Copy {
    /// Encode as a word
    fn to_word(self) -> u16;
    /// Decode from a word
    fn from_word(word: u16) -> Self;
}

impl TableWord for u16 {
    fn to_word(self) -> u16 {
        self
    }

    fn from_word(word: u16) -> Self {
        word
    }
}

impl TableWord for Ident {
    fn to_word(self) -> u16 {
        self.value()
    }

    fn from_word(word: u16) -> Self {
        Ident::new(word)
    }
}

impl TableWord for Ref {
    fn to_word(self) -> u16 {
        self.value()
    }

    fn from_word(word: u16) -> Self {
        Ref(word)
    }
}

/// Outcome of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Stored in a free row
    Inserted {
        /// Row used
        row: usize,
    },
    /// The key was present; its value was overwritten
    Replaced {
        /// Row used
        row: usize,
    },
    /// Every row within the budget belonged to another key; nothing was written
    Exhausted,
    /// The key encodes to the empty marker and cannot be stored
    EmptyKey,
}

impl Probe {
    /// Whether the value was written
    pub fn is_stored(self) -> bool {
        matches!(self, Self::Inserted { .. } | Self::Replaced { .. })
    }
}

/// Open-addressing table logic, parameterised by key type, value type and probe budget
#[derive(Debug, Clone, Copy)]
pub struct OpenTable<K, V> {
    probe_budget: usize,
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> OpenTable<K, V>
where
    K: TableWord + PartialEq,
    V: TableWord,
{
    /// Create with the given probe budget
    pub const fn new(probe_budget: usize) -> Self {
        Self {
            probe_budget,
            _marker: PhantomData,
        }
    }

    /// Rows examined before giving up
    pub fn probe_budget(&self) -> usize {
        self.probe_budget
    }

    /// Number of rows in a region
    pub fn rows(region: &[u16]) -> usize {
        region.len() / 2
    }

    /// Home row of a key in a table of `rows` rows
    pub fn home_row(key: K, rows: usize) -> usize {
        usize::from(key.to_word()) % rows
    }

    fn probe_rows(&self, key: K, rows: usize) -> impl Iterator<Item = usize> {
        let home = Self::home_row(key, rows);
        (0..self.probe_budget).map(move |step| (home + step) % rows)
    }

    /// Store `value` under `key`
    pub fn insert(&self, region: &mut [u16], key: K, value: V) -> Probe {
        let rows = Self::rows(region);
        let key_word = key.to_word();
        if key_word == 0 {
            return Probe::EmptyKey;
        }
        if rows == 0 {
            return Probe::Exhausted;
        }

        for row in self.probe_rows(key, rows) {
            let slot = row * 2;
            match region[slot] {
                0 => {
                    region[slot] = key_word;
                    region[slot + 1] = value.to_word();
                    return Probe::Inserted { row };
                }
                existing if existing == key_word => {
                    region[slot + 1] = value.to_word();
                    return Probe::Replaced { row };
                }
                _ => {}
            }
        }
        Probe::Exhausted
    }

    /// Value stored under `key`, if it can be reached within the budget
    pub fn lookup(&self, region: &[u16], key: K) -> Option<V> {
        let rows = Self::rows(region);
        let key_word = key.to_word();
        if rows == 0 || key_word == 0 {
            return None;
        }

        for row in self.probe_rows(key, rows) {
            let slot = row * 2;
            match region[slot] {
                0 => return None,
                existing if existing == key_word => return Some(V::from_word(region[slot + 1])),
                _ => {}
            }
        }
        None
    }

    /// Occupied rows as `(key, value)` pairs, in row order
    pub fn entries(region: &[u16]) -> impl Iterator<Item = (K, V)> + '_ {
        region
            .chunks_exact(2)
            .filter(|pair| pair[0] != 0)
            .map(|pair| (K::from_word(pair[0]), V::from_word(pair[1])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type WordTable = OpenTable<u16, u16>;

    #[test]
    fn test_insert_at_home_row() {
        let table = WordTable::new(3);
        let mut region = vec![0u16; 14];
        assert_eq!(table.insert(&mut region, 9, 90), Probe::Inserted { row: 2 });
        assert_eq!(region[4], 9);
        assert_eq!(region[5], 90);
        assert_eq!(table.lookup(&region, 9), Some(90));
    }

    #[test]
    fn test_replace() {
        let table = WordTable::new(3);
        let mut region = vec![0u16; 14];
        table.insert(&mut region, 9, 90);
        assert_eq!(table.insert(&mut region, 9, 91), Probe::Replaced { row: 2 });
        assert_eq!(table.lookup(&region, 9), Some(91));
    }

    #[test]
    fn test_collision_steps_forward_and_wraps() {
        let table = WordTable::new(3);
        let mut region = vec![0u16; 6]; // 3 rows
        assert_eq!(table.insert(&mut region, 2, 1), Probe::Inserted { row: 2 });
        assert_eq!(table.insert(&mut region, 5, 2), Probe::Inserted { row: 0 });
        assert_eq!(table.insert(&mut region, 8, 3), Probe::Inserted { row: 1 });
        assert_eq!(table.lookup(&region, 8), Some(3));
    }

    #[test]
    fn test_budget_exhausted() {
        let table = WordTable::new(3);
        let mut region = vec![0u16; 14]; // 7 rows
        for key in [1, 8, 15] {
            assert!(table.insert(&mut region, key, key).is_stored());
        }
        let before = region.clone();
        assert_eq!(table.insert(&mut region, 22, 22), Probe::Exhausted);
        assert_eq!(region, before);
        assert_eq!(table.lookup(&region, 22), None);
    }

    #[test]
    fn test_lookup_stops_at_empty_row() {
        let table = WordTable::new(3);
        let region = vec![0u16; 10];
        assert_eq!(table.lookup(&region, 4), None);
    }

    #[test]
    fn test_zero_key_rejected() {
        let table = WordTable::new(3);
        let mut region = vec![0u16; 10];
        assert_eq!(table.insert(&mut region, 0, 5), Probe::EmptyKey);
        assert!(region.iter().all(|&w| w == 0));
    }

    #[test]
    fn test_larger_budget_reaches_further() {
        let table = WordTable::new(5);
        let mut region = vec![0u16; 14];
        for key in [1, 8, 15, 22] {
            assert!(table.insert(&mut region, key, key).is_stored());
        }
        assert_eq!(table.lookup(&region, 22), Some(22));
    }

    #[test]
    fn test_entries() {
        let table = OpenTable::<Ident, Ref>::new(3);
        let mut region = vec![0u16; 10];
        table.insert(&mut region, Ident(7), Ref(300));
        let entries: Vec<_> = OpenTable::<Ident, Ref>::entries(&region).collect();
        assert_eq!(entries, vec![(Ident(7), Ref(300))]);
    }
}
