//! Pool of tile symbols available to new tile codes.
//!
//! The pool is a bitset over the fixed alphabet. It is derived from a tile
//! code table when a file is opened and never persisted. The air symbol is
//! permanently in use.

use lvlforge_types::{ALPHABET_LEN, Symbol, alphabet};

const WORDS: usize = ALPHABET_LEN.div_ceil(64);

/// Handed out only when nothing else is free. A room row starting with two of
/// these can read back as a comment, tag or entry line.
const LAST_RESORT: [char; 2] = ['/', '\\'];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error("all tile symbols are in use")]
    Exhausted,
    #[error("symbol {0} is not allocated")]
    NotAllocated(Symbol),
    #[error("symbol {0} is already allocated")]
    AlreadyAllocated(Symbol),
    #[error("symbol {0} is reserved")]
    Reserved(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolAllocator {
    used: [u64; WORDS],
}

impl Default for SymbolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolAllocator {
    /// An allocator with only the air symbol in use.
    pub fn new() -> Self {
        let mut alloc = Self { used: [0; WORDS] };
        alloc.set(Symbol::AIR.index(), true);
        alloc
    }

    /// An allocator with every symbol in `used` marked as taken. Duplicates are
    /// tolerated.
    pub fn from_used(used: impl IntoIterator<Item = Symbol>) -> Self {
        let mut alloc = Self::new();
        for symbol in used {
            alloc.set(symbol.index(), true);
        }
        alloc
    }

    fn get(&self, index: usize) -> bool {
        self.used[index / 64] & (1u64 << (index % 64)) != 0
    }

    fn set(&mut self, index: usize, on: bool) {
        let bit = 1u64 << (index % 64);
        if on {
            self.used[index / 64] |= bit;
        } else {
            self.used[index / 64] &= !bit;
        }
    }

    /// Take the lowest free symbol in alphabet order, keeping `/` and `\\`
    /// for last.
    pub fn allocate(&mut self) -> Result<Symbol, AllocError> {
        let index = (0..ALPHABET_LEN)
            .filter(|&i| !self.get(i))
            .min_by_key(|&i| (LAST_RESORT.contains(&alphabet()[i].as_char()), i))
            .ok_or(AllocError::Exhausted)?;
        self.set(index, true);
        let symbol = alphabet()[index];
        log::debug!("allocated tile symbol {symbol}");
        Ok(symbol)
    }

    /// Mark a specific symbol as taken.
    pub fn claim(&mut self, symbol: Symbol) -> Result<(), AllocError> {
        if symbol.is_air() {
            return Err(AllocError::Reserved(symbol));
        }
        if self.get(symbol.index()) {
            return Err(AllocError::AlreadyAllocated(symbol));
        }
        self.set(symbol.index(), true);
        Ok(())
    }

    /// Return a symbol to the pool.
    pub fn release(&mut self, symbol: Symbol) -> Result<(), AllocError> {
        if symbol.is_air() {
            return Err(AllocError::Reserved(symbol));
        }
        if !self.get(symbol.index()) {
            return Err(AllocError::NotAllocated(symbol));
        }
        self.set(symbol.index(), false);
        log::debug!("released tile symbol {symbol}");
        Ok(())
    }

    pub fn is_free(&self, symbol: Symbol) -> bool {
        !self.get(symbol.index())
    }

    pub fn free_count(&self) -> usize {
        ALPHABET_LEN - self.used_count()
    }

    /// Symbols in use, air included.
    pub fn used_count(&self) -> usize {
        self.used.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn free_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        alphabet()
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.get(*i))
            .map(|(_, s)| *s)
    }
}
