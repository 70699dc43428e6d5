use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::cp1252;

/// Number of symbols in the allocator alphabet.
pub const ALPHABET_LEN: usize = 215;

/// A single-character tile symbol.
///
/// Only characters from the fixed [`alphabet`] are valid symbols. The space
/// character is never one: it separates the foreground and background halves
/// of a dual room row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(char);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0:?} is not a valid tile symbol")]
pub struct InvalidSymbol(pub char);

impl Symbol {
    /// `'0'`, the "no tile" symbol.
    pub const AIR: Symbol = Symbol('0');

    pub fn new(c: char) -> Result<Self, InvalidSymbol> {
        if alphabet_index(c).is_some() {
            Ok(Self(c))
        } else {
            Err(InvalidSymbol(c))
        }
    }

    pub const fn as_char(self) -> char {
        self.0
    }

    pub const fn is_air(self) -> bool {
        self.0 == '0'
    }

    /// Position of this symbol in the alphabet.
    pub fn index(self) -> usize {
        alphabet_index(self.0).expect("Symbol is only constructed from alphabet characters")
    }

    /// Symbol at `index` in alphabet order.
    pub fn from_index(index: usize) -> Option<Self> {
        alphabet().get(index).copied()
    }
}

impl TryFrom<char> for Symbol {
    type Error = InvalidSymbol;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c)
    }
}

impl From<Symbol> for char {
    fn from(s: Symbol) -> char {
        s.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Windows-1252 bytes that decode to something but are not usable as symbols:
/// DEL, no-break space and soft hyphen.
const EXCLUDED_BYTES: [u8; 3] = [0x7F, 0xA0, 0xAD];

/// The allocator alphabet in allocation order.
///
/// Every visible Windows-1252 character from `0x21` upward, in byte order.
pub fn alphabet() -> &'static [Symbol] {
    static ALPHABET: OnceLock<Vec<Symbol>> = OnceLock::new();
    ALPHABET.get_or_init(|| {
        (0x21u8..=0xFF)
            .filter(|b| !EXCLUDED_BYTES.contains(b))
            .filter_map(cp1252::decode_byte)
            .map(Symbol)
            .collect()
    })
}

fn alphabet_index(c: char) -> Option<usize> {
    alphabet().iter().position(|s| s.0 == c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_size() {
        assert_eq!(alphabet().len(), ALPHABET_LEN);
    }

    #[test]
    fn alphabet_starts_with_bang_and_ends_with_y_diaeresis() {
        assert_eq!(alphabet()[0].as_char(), '!');
        assert_eq!(alphabet()[ALPHABET_LEN - 1].as_char(), 'ÿ');
    }

    #[test]
    fn space_is_not_a_symbol() {
        assert_eq!(Symbol::new(' '), Err(InvalidSymbol(' ')));
        assert!(Symbol::new('\u{A0}').is_err());
        assert!(Symbol::new('\t').is_err());
    }

    #[test]
    fn index_matches_alphabet_position() {
        for (i, s) in alphabet().iter().enumerate() {
            assert_eq!(s.index(), i, "symbol {s:?}");
            assert_eq!(Symbol::from_index(i), Some(*s));
        }
    }

    #[test]
    fn no_duplicates() {
        let mut chars: Vec<char> = alphabet().iter().map(|s| s.as_char()).collect();
        chars.sort_unstable();
        chars.dedup();
        assert_eq!(chars.len(), ALPHABET_LEN);
    }

    #[test]
    fn air() {
        assert!(Symbol::AIR.is_air());
        assert_eq!(Symbol::new('0'), Ok(Symbol::AIR));
        assert!(!Symbol::new('1').unwrap().is_air());
    }

    #[test]
    fn high_half_symbols() {
        assert!(Symbol::new('€').is_ok());
        assert!(Symbol::new('é').is_ok());
        assert!(Symbol::new('\u{AD}').is_err());
    }
}
