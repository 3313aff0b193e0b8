//! Heap references and cell layouts
//!
//! ```text
//! string / class / array   [tag][len][w0 .. w(len-1)][pad]
//! int / float              [tag][c0][c1][c2][pad]
//! table                    [tag][rows][k0 v0 .. k(rows-1) v(rows-1)][pad pad]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Added to every heap offset to form a [`Ref`]
pub const MEMBASE: usize = 256;

/// Longest string or array a cell can hold
pub const MAX_ARRAY_LEN: usize = 1023;

/// Words taken by a number cell, pad included
pub const NUM_CELL_WORDS: usize = 5;

/// Smallest row count a table can be asked for
pub const MIN_TABLE_ROWS: usize = 2;

/// Largest row count a table can be asked for
pub const MAX_TABLE_ROWS: usize = 127;

/// Largest heap whose every offset still fits in a [`Ref`]
pub const MAX_HEAP_WORDS: usize = u16::MAX as usize + 1 - MEMBASE;

/// Address of a heap cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ref(pub u16);

impl Ref {
    /// The nil reference
    pub const NIL: Self = Self(MEMBASE as u16);

    /// Reference for a heap offset
    #[inline]
    pub const fn from_offset(offset: usize) -> Self {
        Self((offset + MEMBASE) as u16)
    }

    /// Heap offset of the cell, `None` for nil and raw byte values
    #[inline]
    pub const fn offset(self) -> Option<usize> {
        if (self.0 as usize) > MEMBASE {
            Some(self.0 as usize - MEMBASE)
        } else {
            None
        }
    }

    /// Whether this is the nil reference
    #[inline]
    pub const fn is_nil(self) -> bool {
        self.0 == Self::NIL.0
    }

    /// The raw word
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Ref {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("nil")
        } else {
            write!(f, "@{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Ref::from_offset(1), Ref(257));
        assert_eq!(Ref(257).offset(), Some(1));
        assert_eq!(Ref::NIL.offset(), None);
        assert_eq!(Ref(42).offset(), None);
    }

    #[test]
    fn test_largest_offset_fits() {
        let last = Ref::from_offset(MAX_HEAP_WORDS - 1);
        assert_eq!(last, Ref(u16::MAX));
        assert_eq!(last.offset(), Some(MAX_HEAP_WORDS - 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Ref::NIL.to_string(), "nil");
        assert_eq!(Ref(300).to_string(), "@300");
    }
}
