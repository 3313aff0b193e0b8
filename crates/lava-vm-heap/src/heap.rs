//! Heap management
//!
//! Every operation here is fail-soft: bad input is logged and answered with a
//! sentinel ([`Ref::NIL`], `false`, a zero word) or a dropped write.

use lava_vm_core::symbols::{CLAS, FLOT, INTG, STRG};
use lava_vm_core::{Ident, Num48};
use serde::{Deserialize, Serialize};

use crate::cell::{
    MAX_ARRAY_LEN, MAX_HEAP_WORDS, MAX_TABLE_ROWS, MIN_TABLE_ROWS, NUM_CELL_WORDS, Ref,
};
use crate::table::{OpenTable, Probe};

/// Heap configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapConfig {
    /// Size of the word array (default: 4096, at most 65280)
    pub words: usize,
    /// Table rows examined before a put or get gives up (default: 3)
    pub probe_budget: usize,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            words: 4096,
            probe_budget: 3,
        }
    }
}

/// Allocation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    /// Words handed out, including the unused word 0
    pub used: usize,
    /// Size of the word array
    pub capacity: usize,
    /// Cells allocated
    pub objects: usize,
}

/// The VM's working memory
#[derive(Debug, Clone)]
pub struct Heap {
    config: HeapConfig,
    words: Vec<u16>,
    /// Next free offset. Offset 0 is never handed out.
    ptr: usize,
    objects: usize,
    tables: OpenTable<Ident, Ref>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(HeapConfig::default())
    }
}

impl Heap {
    /// Create a heap. Sizes above the addressable limit, and a size of 0, are clamped.
    pub fn new(config: HeapConfig) -> Self {
        let mut config = config;
        if config.words > MAX_HEAP_WORDS {
            tracing::warn!(
                target: "lava::heap",
                requested = config.words,
                limit = MAX_HEAP_WORDS,
                "heap size clamped"
            );
            config.words = MAX_HEAP_WORDS;
        }
        if config.words == 0 {
            tracing::warn!(target: "lava::heap", "heap size raised to 1 word");
            config.words = 1;
        }
        Self {
            words: vec![0; config.words],
            ptr: 1,
            objects: 0,
            tables: OpenTable::new(config.probe_budget),
            config,
        }
    }

    /// Create a heap of `words` words with the default probe budget
    pub fn with_words(words: usize) -> Self {
        Self::new(HeapConfig {
            words,
            ..HeapConfig::default()
        })
    }

    /// Get config
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Size of the word array
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Next free offset
    pub fn used(&self) -> usize {
        self.ptr
    }

    /// The whole word array
    pub fn words(&self) -> &[u16] {
        &self.words
    }

    /// Allocation counters
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            used: self.ptr,
            capacity: self.words.len(),
            objects: self.objects,
        }
    }

    /// Claim `size` words, returning the offset of the first one
    fn reserve(&mut self, size: usize, kind: Ident) -> Option<usize> {
        if self.ptr + size > self.words.len() {
            tracing::error!(
                target: "lava::heap",
                kind = %kind,
                size,
                free = self.words.len().saturating_sub(self.ptr),
                "out of heap memory"
            );
            return None;
        }
        let offset = self.ptr;
        self.ptr += size;
        self.objects += 1;
        Some(offset)
    }

    /// Offset of a live cell, logging when `r` does not point into allocated memory
    fn cell(&self, r: Ref, op: &'static str) -> Option<usize> {
        match r.offset() {
            Some(offset) if offset < self.ptr => Some(offset),
            _ => {
                tracing::error!(target: "lava::heap", op, reference = %r, "invalid reference");
                None
            }
        }
    }

    fn word(&self, offset: usize) -> u16 {
        self.words.get(offset).copied().unwrap_or(0)
    }

    /// Kind tag of a cell
    pub fn type_of(&self, r: Ref) -> Ident {
        match self.cell(r, "type_of") {
            Some(offset) => Ident::new(self.words[offset]),
            None => Ident::NONE,
        }
    }

    // ------------------------------------------------------------------
    // Strings and arrays

    /// Store a string of character codes
    pub fn alloc_string(&mut self, chars: &[u16]) -> Ref {
        self.alloc_array_from(STRG, chars)
    }

    /// Store a string, one word per UTF-16 code unit
    pub fn alloc_str(&mut self, text: &str) -> Ref {
        let chars: Vec<u16> = text.encode_utf16().collect();
        self.alloc_string(&chars)
    }

    /// Store a class name. Same layout as a string, different tag.
    pub fn alloc_class(&mut self, chars: &[u16]) -> Ref {
        self.alloc_array_from(CLAS, chars)
    }

    /// Store an existing word slice as a tagged array
    pub fn alloc_array_from(&mut self, tag: Ident, data: &[u16]) -> Ref {
        if data.len() > MAX_ARRAY_LEN {
            tracing::error!(target: "lava::heap", kind = %tag, len = data.len(), "array is too long");
            return Ref::NIL;
        }
        let Some(offset) = self.reserve(data.len() + 3, tag) else {
            return Ref::NIL;
        };
        self.words[offset] = tag.value();
        self.words[offset + 1] = data.len() as u16;
        self.words[offset + 2..offset + 2 + data.len()].copy_from_slice(data);
        Ref::from_offset(offset)
    }

    /// Allocate a zeroed tagged array
    pub fn alloc_array(&mut self, tag: Ident, len: usize) -> Ref {
        if len > MAX_ARRAY_LEN {
            tracing::error!(target: "lava::heap", kind = %tag, len, "array is too long");
            return Ref::NIL;
        }
        let Some(offset) = self.reserve(len + 3, tag) else {
            return Ref::NIL;
        };
        self.words[offset] = tag.value();
        self.words[offset + 1] = len as u16;
        Ref::from_offset(offset)
    }

    /// Length of a string or array
    pub fn array_length(&self, r: Ref) -> usize {
        self.cell(r, "array_length")
            .map_or(0, |offset| usize::from(self.word(offset + 1)))
    }

    /// Write one element. The index is not checked against the array length.
    pub fn store_array(&mut self, r: Ref, index: usize, value: u16) {
        let Some(offset) = self.cell(r, "store_array") else {
            return;
        };
        match self.words.get_mut(offset + 2 + index) {
            Some(word) => *word = value,
            None => {
                tracing::error!(target: "lava::heap", reference = %r, index, "store past end of heap")
            }
        }
    }

    /// Read one element. The index is not checked against the array length.
    pub fn load_array(&self, r: Ref, index: usize) -> u16 {
        self.cell(r, "load_array")
            .map_or(0, |offset| self.word(offset + 2 + index))
    }

    /// Character codes of a string or class cell
    pub fn read_string(&self, r: Ref) -> Vec<u16> {
        let Some(offset) = self.cell(r, "read_string") else {
            return Vec::new();
        };
        let len = usize::from(self.word(offset + 1));
        let start = (offset + 2).min(self.words.len());
        let end = (start + len).min(self.words.len());
        self.words[start..end].to_vec()
    }

    /// A string cell as text. Unpaired surrogates become U+FFFD.
    pub fn read_str(&self, r: Ref) -> String {
        String::from_utf16_lossy(&self.read_string(r))
    }

    // ------------------------------------------------------------------
    // Numbers

    /// Store an int
    pub fn alloc_int(&mut self, value: Num48) -> Ref {
        self.alloc_num(INTG, value)
    }

    /// Store a float
    pub fn alloc_float(&mut self, value: Num48) -> Ref {
        self.alloc_num(FLOT, value)
    }

    fn alloc_num(&mut self, tag: Ident, value: Num48) -> Ref {
        let Some(offset) = self.reserve(NUM_CELL_WORDS, tag) else {
            return Ref::NIL;
        };
        let (c0, c1, c2) = value.to_chars();
        self.words[offset..offset + 4].copy_from_slice(&[tag.value(), c0, c1, c2]);
        Ref::from_offset(offset)
    }

    /// Value of an int cell
    pub fn read_int(&self, r: Ref) -> Num48 {
        match self.cell(r, "read_int") {
            Some(offset) => Num48::from_chars(
                self.word(offset + 1),
                self.word(offset + 2),
                self.word(offset + 3),
            ),
            None => Num48::ZERO,
        }
    }

    /// Value of a float cell. Floats share the int layout.
    pub fn read_float(&self, r: Ref) -> Num48 {
        self.read_int(r)
    }

    /// Overwrite an int cell in place. Returns `false`, changing nothing, when
    /// `r` is not an int cell.
    pub fn update_int(&mut self, r: Ref, value: Num48) -> bool {
        let Some(offset) = self.cell(r, "update_int") else {
            return false;
        };
        if self.words[offset] != INTG.value() {
            tracing::warn!(
                target: "lava::heap",
                reference = %r,
                tag = %Ident::new(self.words[offset]),
                "update_int on a cell that is not an int"
            );
            return false;
        }
        let (c0, c1, c2) = value.to_chars();
        match self.words.get_mut(offset + 1..offset + 4) {
            Some(digits) => digits.copy_from_slice(&[c0, c1, c2]),
            None => {
                tracing::error!(target: "lava::heap", reference = %r, "int cell runs past end of heap");
                return false;
            }
        }
        tracing::debug!(target: "lava::heap", reference = %r, value = %value, "int updated");
        true
    }

    // ------------------------------------------------------------------
    // Tables

    /// Rows actually allocated for a request of `requested` rows: 30% headroom,
    /// rounded up to an odd count
    pub fn table_rows_for(requested: usize) -> usize {
        let rows = (requested * 13).div_ceil(10);
        if rows % 2 == 0 { rows + 1 } else { rows }
    }

    /// Allocate a table with room for about `requested` entries (2 to 127).
    /// Tables never grow.
    pub fn alloc_table(&mut self, tag: Ident, requested: usize) -> Ref {
        if !(MIN_TABLE_ROWS..=MAX_TABLE_ROWS).contains(&requested) {
            tracing::error!(target: "lava::heap", kind = %tag, requested, "table size out of range");
            return Ref::NIL;
        }
        let rows = Self::table_rows_for(requested);
        let Some(offset) = self.reserve(rows * 2 + 4, tag) else {
            return Ref::NIL;
        };
        self.words[offset] = tag.value();
        self.words[offset + 1] = rows as u16;
        tracing::debug!(target: "lava::heap", kind = %tag, requested, rows, offset, "table created");
        Ref::from_offset(offset)
    }

    /// Row count of a table
    pub fn table_rows(&self, table: Ref) -> usize {
        self.cell(table, "table_rows")
            .map_or(0, |offset| usize::from(self.word(offset + 1)))
    }

    fn table_region(&self, table: Ref, op: &'static str) -> Option<std::ops::Range<usize>> {
        let offset = self.cell(table, op)?;
        let rows = usize::from(self.word(offset + 1));
        let start = offset + 2;
        let end = start + rows * 2;
        if end > self.words.len() {
            tracing::error!(target: "lava::heap", op, table = %table, rows, "table runs past end of heap");
            return None;
        }
        Some(start..end)
    }

    /// Store `value` under `key`. When the probe budget runs out the write is
    /// logged and dropped.
    pub fn put(&mut self, table: Ref, key: Ident, value: Ref) {
        let Some(region) = self.table_region(table, "put") else {
            return;
        };
        match self.tables.insert(&mut self.words[region], key, value) {
            Probe::Inserted { row } | Probe::Replaced { row } => {
                tracing::trace!(target: "lava::heap", table = %table, key = %key, value = %value, row, "put");
            }
            Probe::Exhausted => {
                tracing::error!(
                    target: "lava::heap",
                    table = %table,
                    key = %key,
                    budget = self.tables.probe_budget(),
                    "too many slot misses, entry dropped; increase the table size"
                );
            }
            Probe::EmptyKey => {
                tracing::error!(target: "lava::heap", table = %table, "key 0 cannot be stored");
            }
        }
    }

    /// Value under `key`, or [`Ref::NIL`] when absent or out of probe reach
    pub fn get(&self, table: Ref, key: Ident) -> Ref {
        let Some(region) = self.table_region(table, "get") else {
            return Ref::NIL;
        };
        self.tables
            .lookup(&self.words[region], key)
            .unwrap_or(Ref::NIL)
    }

    /// Occupied rows of a table
    pub fn table_entries(&self, table: Ref) -> Vec<(Ident, Ref)> {
        match self.table_region(table, "table_entries") {
            Some(region) => OpenTable::<Ident, Ref>::entries(&self.words[region]).collect(),
            None => Vec::new(),
        }
    }
}
