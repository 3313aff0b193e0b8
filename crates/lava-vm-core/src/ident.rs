//! Symbol codes
//!
//! An [`Ident`] is the VM's name for a class, field, method or object tag. It is
//! four base-16 digits, one per character, taken from this table:
//!
//! ```text
//!  0 = 0 _ SPACE     8 = 8 S Z
//!  1 = 1 G J         9 = 9 U W
//!  2 = 2 H X        10 = A
//!  3 = 3 I Y        11 = B P
//!  4 = 4 L          12 = C K Q
//!  5 = 5 M N        13 = D T
//!  6 = 6 O          14 = E
//!  7 = 7 R          15 = F V
//! ```
//!
//! Letters are case-insensitive. Many names share a code and that is expected:
//! `"GOLD"` and `"JOLT"` are the same symbol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 16-bit symbol code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ident(pub u16);

/// Which representative character set [`Ident::to_name`] decodes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentVariant {
    /// `_GHILNORSUABCDEF`
    #[default]
    Primary,
    /// `0JXYLMoRZWaPKTeV`
    Alternate,
}

const PRIMARY: &[u8; 16] = b"_GHILNORSUABCDEF";
const ALTERNATE: &[u8; 16] = b"0JXYLMoRZWaPKTeV";

/// Characters that count toward a symbol
const WIDTH: usize = 4;

impl Ident {
    /// No symbol. Also the marker for an empty table row.
    pub const NONE: Self = Self(0);
    /// The nil sentinel
    pub const NIL: Self = Self(256);
    /// Smallest code that names a symbol
    pub const MIN: u16 = 257;
    /// Largest code that names a symbol
    pub const MAX: u16 = 65_407;

    /// Wrap a raw code
    #[inline]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// The raw code
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Encode a name.
    ///
    /// Names shorter than four characters are padded as `0X00`, `0XY0` and `0XYZ`;
    /// longer names are cut to their first four characters.
    pub fn from_name(name: &str) -> Self {
        let chars: Vec<char> = name.chars().map(|c| c.to_ascii_uppercase()).collect();
        let padded: Vec<char> = match chars.len() {
            0 => {
                tracing::warn!(target: "lava::ident", "empty name has no symbol");
                return Self::NONE;
            }
            1 => vec!['0', chars[0], '0', '0'],
            2 => vec!['0', chars[0], chars[1], '0'],
            3 => vec!['0', chars[0], chars[1], chars[2]],
            _ => chars[..WIDTH].to_vec(),
        };

        let code = padded
            .iter()
            .fold(0u16, |acc, &c| acc * 16 + u16::from(encode_char(c)));
        Self(code)
    }

    /// Decode into one representative name. This is not the inverse of
    /// [`from_name`](Self::from_name): it only picks a name with the same code.
    ///
    /// Codes outside `257..=65407` log a warning and give an empty string.
    pub fn to_name(self, variant: IdentVariant) -> String {
        if !(Self::MIN..=Self::MAX).contains(&self.0) {
            tracing::warn!(target: "lava::ident", code = self.0, "code is out of range");
            return String::new();
        }
        let set = match variant {
            IdentVariant::Primary => PRIMARY,
            IdentVariant::Alternate => ALTERNATE,
        };
        (0..WIDTH)
            .rev()
            .map(|shift| char::from(set[usize::from((self.0 >> (shift * 4)) & 0xF)]))
            .collect()
    }
}

/// Digit for one character. Anything outside `' '..='z'` logs and maps to 0.
fn encode_char(c: char) -> u8 {
    match c.to_ascii_uppercase() {
        ' ' | '0' | '_' => 0,
        '1' | 'G' | 'J' => 1,
        '2' | 'H' | 'X' => 2,
        '3' | 'I' | 'Y' => 3,
        '4' | 'L' => 4,
        '5' | 'M' | 'N' => 5,
        '6' | 'O' => 6,
        '7' | 'R' => 7,
        '8' | 'S' | 'Z' => 8,
        '9' | 'U' | 'W' => 9,
        'A' => 10,
        'B' | 'P' => 11,
        'C' | 'K' | 'Q' => 12,
        'D' | 'T' => 13,
        'E' => 14,
        'F' | 'V' => 15,
        ' '..='z' => 0,
        other => {
            tracing::warn!(target: "lava::ident", char = ?other, "character is out of range");
            0
        }
    }
}

impl From<u16> for Ident {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_chars() {
        // S=8 T=13 R=7 G=1
        assert_eq!(Ident::from_name("STRG"), Ident(36209));
        assert_eq!(Ident::from_name("strg"), Ident(36209));
    }

    #[test]
    fn test_padding() {
        assert_eq!(Ident::from_name("X"), Ident(0x0200));
        assert_eq!(Ident::from_name("AB"), Ident(0x0AB0));
        assert_eq!(Ident::from_name("ABC"), Ident(0x0ABC));
    }

    #[test]
    fn test_truncation() {
        assert_eq!(Ident::from_name("StringBuilder"), Ident::from_name("STRI"));
        assert_eq!(Ident::from_name("main"), Ident::from_name("MAINTAIN"));
    }

    #[test]
    fn test_aliasing() {
        assert_eq!(Ident::from_name("GOLD"), Ident::from_name("JOLT"));
        assert_eq!(Ident::from_name("1"), Ident::from_name("G"));
        assert_ne!(Ident::from_name("GOLD"), Ident::from_name("GOLF"));
    }

    #[test]
    fn test_synthetic_key() {
        assert_eq!(Ident::from_name("9001"), Ident(0x9001));
        assert_eq!(Ident::from_name("9042"), Ident(0x9042));
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(Ident::from_name(""), Ident::NONE);
    }

    #[test]
    fn test_out_of_range_chars() {
        assert_eq!(Ident::from_name("<init>"), Ident::from_name("_INI"));
        assert_eq!(Ident::from_name("é"), Ident::NONE);
    }

    #[test]
    fn test_to_name() {
        assert_eq!(Ident::from_name("MAIN").to_name(IdentVariant::Primary), "NAIN");
        assert_eq!(Ident::from_name("MAIN").to_name(IdentVariant::Alternate), "MaYM");
        assert_eq!(Ident(0x0200).to_name(IdentVariant::Primary), "_H__");
        assert_eq!(Ident(0x0200).to_name(IdentVariant::Alternate), "0X00");
    }

    #[test]
    fn test_to_name_out_of_range() {
        assert_eq!(Ident(256).to_name(IdentVariant::Primary), "");
        assert_eq!(Ident(65_408).to_name(IdentVariant::Primary), "");
        assert_eq!(Ident(257).to_name(IdentVariant::Primary), "_G_G");
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Ident(0x0200).to_string(), "0x0200");
        assert_eq!(Ident(0xFE0B).to_string(), "0xfe0b");
    }
}
