//! The tile code table of an open level: the file's own codes plus codes
//! inherited from dependency files, and the `\?` line codec.

use lvlforge_types::{
    BlendParseError, BlendedTileCode, Section, Symbol, TileCode, TileCodeOrigin, TileVocabulary,
};

use crate::allocator::{AllocError, SymbolAllocator};
use crate::kv_codec::{pad_to_column, push_comment, split_comment};
use crate::level_file::{LevelParseError, parse_err};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileCodeError {
    #[error("symbol {0} is already in use")]
    DuplicateSymbol(Symbol),
    #[error("unknown tile name {0:?}")]
    UnknownTileName(String),
    #[error("tile code {expr} already exists as {symbol}")]
    DuplicateTileCode { expr: String, symbol: Symbol },
    #[error("no tile symbols left; remove an unused tile code first")]
    AllocatorExhausted,
    #[error("symbol {0} is reserved")]
    ReservedSymbol(Symbol),
    #[error("symbol {0} has no tile code")]
    UndefinedSymbol(Symbol),
    #[error(transparent)]
    Blend(#[from] BlendParseError),
}

impl From<AllocError> for TileCodeError {
    fn from(e: AllocError) -> Self {
        match e {
            AllocError::Exhausted => Self::AllocatorExhausted,
            AllocError::AlreadyAllocated(s) => Self::DuplicateSymbol(s),
            AllocError::Reserved(s) => Self::ReservedSymbol(s),
            AllocError::NotAllocated(s) => Self::UndefinedSymbol(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TileCodeEntry {
    pub code: TileCode,
    pub origin: TileCodeOrigin,
}

impl TileCodeEntry {
    pub fn is_own(&self) -> bool {
        self.origin == TileCodeOrigin::Own
    }
}

/// Symbol-unique table of tile codes.
///
/// Own codes keep the order they were read or added in; that is the order
/// they are written back in. Inherited codes are never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCodeTable {
    entries: Vec<TileCodeEntry>,
}

impl TileCodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, symbol: Symbol) -> Option<usize> {
        self.entries.iter().position(|e| e.code.symbol == symbol)
    }

    pub fn get(&self, symbol: Symbol) -> Option<&TileCodeEntry> {
        self.entries.iter().find(|e| e.code.symbol == symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.position(symbol).is_some()
    }

    /// Entry placing the same tiles at the same odds as `blend`.
    pub fn find_equivalent(&self, blend: &BlendedTileCode) -> Option<&TileCodeEntry> {
        self.entries
            .iter()
            .find(|e| e.code.blend().is_ok_and(|b| b.is_equivalent(blend)))
    }

    pub fn entries(&self) -> &[TileCodeEntry] {
        &self.entries
    }

    /// The file's own codes, in file order.
    pub fn own(&self) -> impl Iterator<Item = &TileCode> {
        self.entries.iter().filter(|e| e.is_own()).map(|e| &e.code)
    }

    pub fn inherited(&self) -> impl Iterator<Item = &TileCodeEntry> {
        self.entries.iter().filter(|e| !e.is_own())
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.entries.iter().map(|e| e.code.symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A fresh allocator with every symbol of this table in use.
    pub fn allocator(&self) -> SymbolAllocator {
        SymbolAllocator::from_used(self.symbols())
    }

    /// Add a code read from the file itself. It shadows an inherited code on
    /// the same symbol; a second own code on the same symbol is refused.
    pub fn insert_own(&mut self, code: TileCode) -> Result<(), TileCodeError> {
        match self.position(code.symbol) {
            Some(i) if self.entries[i].is_own() => {
                return Err(TileCodeError::DuplicateSymbol(code.symbol));
            }
            Some(i) => {
                log::debug!(
                    "own tile code {} shadows inherited {}",
                    code.symbol,
                    self.entries[i].code.tile_name
                );
                self.entries.remove(i);
            }
            None => {}
        }
        self.entries.push(TileCodeEntry {
            code,
            origin: TileCodeOrigin::Own,
        });
        Ok(())
    }

    /// Add a code from outside the file. It replaces an earlier inherited code
    /// on the same symbol and never replaces an own one. Returns whether it
    /// was added.
    pub fn inherit(&mut self, code: TileCode, origin: TileCodeOrigin) -> bool {
        match self.position(code.symbol) {
            Some(i) if self.entries[i].is_own() => return false,
            Some(i) => {
                self.entries[i] = TileCodeEntry { code, origin };
            }
            None => self.entries.push(TileCodeEntry { code, origin }),
        }
        true
    }

    fn check_names(
        vocabulary: &dyn TileVocabulary,
        blend: &BlendedTileCode,
    ) -> Result<(), TileCodeError> {
        for name in [blend.primary.as_str(), blend.secondary.as_str()] {
            if !vocabulary.contains(name) {
                return Err(TileCodeError::UnknownTileName(name.to_string()));
            }
        }
        Ok(())
    }

    /// Bind `code.symbol` to its tile expression.
    pub fn define(
        &mut self,
        allocator: &mut SymbolAllocator,
        vocabulary: &dyn TileVocabulary,
        code: TileCode,
    ) -> Result<(), TileCodeError> {
        if self.contains(code.symbol) {
            return Err(TileCodeError::DuplicateSymbol(code.symbol));
        }
        Self::check_names(vocabulary, &code.blend()?)?;
        if !code.symbol.is_air() {
            allocator.claim(code.symbol)?;
        }
        log::debug!("defined {} as {}", code.symbol, code.tile_name);
        self.entries.push(TileCodeEntry {
            code,
            origin: TileCodeOrigin::Own,
        });
        Ok(())
    }

    /// Author a new code from a blend, taking the lowest free symbol.
    pub fn add(
        &mut self,
        allocator: &mut SymbolAllocator,
        vocabulary: &dyn TileVocabulary,
        blend: &BlendedTileCode,
        comment: &str,
    ) -> Result<TileCode, TileCodeError> {
        Self::check_names(vocabulary, blend)?;
        let expr = blend.to_string();
        if let Some(existing) = self.find_equivalent(blend) {
            return Err(TileCodeError::DuplicateTileCode {
                expr,
                symbol: existing.code.symbol,
            });
        }
        let symbol = allocator.allocate()?;
        let code = TileCode::new(symbol, expr).with_comment(comment);
        log::debug!("added {} as {}", code.symbol, code.tile_name);
        self.entries.push(TileCodeEntry {
            code: code.clone(),
            origin: TileCodeOrigin::Own,
        });
        Ok(code)
    }

    /// Remove the code owning `symbol` and return its symbol to the pool.
    ///
    /// Grid cells still holding the symbol are the caller's to clear, see
    /// [`crate::templates::delete_symbol_everywhere`].
    pub fn undefine(
        &mut self,
        allocator: &mut SymbolAllocator,
        symbol: Symbol,
    ) -> Result<TileCodeEntry, TileCodeError> {
        if symbol.is_air() {
            return Err(TileCodeError::ReservedSymbol(symbol));
        }
        let index = self
            .position(symbol)
            .ok_or(TileCodeError::UndefinedSymbol(symbol))?;
        let entry = self.entries.remove(index);
        if let Err(e) = allocator.release(symbol) {
            log::warn!("allocator out of step with tile codes: {e}");
        }
        Ok(entry)
    }

    /// What a grid cell holding `symbol` places.
    pub fn resolve(&self, symbol: Symbol) -> Result<BlendedTileCode, TileCodeError> {
        let entry = self
            .get(symbol)
            .ok_or(TileCodeError::UndefinedSymbol(symbol))?;
        Ok(entry.code.blend()?)
    }
}

/// Parse a `\?expr  S [//comment]` line. `line_num` is 1-based.
pub fn parse_tile_code_line(line_num: usize, line: &str) -> Result<TileCode, LevelParseError> {
    let section = Section::TileCodes;
    let rest = line
        .strip_prefix(section.prefix())
        .ok_or_else(|| parse_err(line_num, section, "expected \\?"))?;
    let (expr, rest) = rest
        .split_once(char::is_whitespace)
        .ok_or_else(|| parse_err(line_num, section, "tile code has no symbol"))?;
    if expr.is_empty() {
        return Err(parse_err(line_num, section, "tile code has no tile name"));
    }
    let rest = rest.trim_start();
    let mut chars = rest.chars();
    let c = chars
        .next()
        .ok_or_else(|| parse_err(line_num, section, "tile code has no symbol"))?;
    let symbol = Symbol::new(c).map_err(|e| parse_err(line_num, section, e.to_string()))?;
    let after = chars.as_str();
    let comment = match split_comment(after) {
        (body, comment) if body.trim().is_empty() => comment.unwrap_or_default(),
        _ => {
            return Err(parse_err(
                line_num,
                section,
                format!("tile symbol must be a single character, got {rest:?}"),
            ));
        }
    };
    Ok(TileCode::new(symbol, expr).with_comment(comment))
}

pub fn format_tile_code_line(code: &TileCode) -> String {
    let mut line = format!("{}{}", Section::TileCodes.prefix(), code.tile_name);
    pad_to_column(&mut line);
    line.push(code.symbol.as_char());
    push_comment(&mut line, &code.comment);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvlforge_types::Vocabulary;

    fn sym(c: char) -> Symbol {
        Symbol::new(c).unwrap()
    }

    fn table(codes: &[(&str, char)]) -> TileCodeTable {
        let mut t = TileCodeTable::new();
        for (name, c) in codes {
            t.insert_own(TileCode::new(sym(*c), *name)).unwrap();
        }
        t
    }

    #[test]
    fn parse_line_with_comment() {
        let code = parse_tile_code_line(4, "\\?floor%50%stone        X // mixed").unwrap();
        assert_eq!(code.tile_name, "floor%50%stone");
        assert_eq!(code.symbol, sym('X'));
        assert_eq!(code.comment, " mixed");
    }

    #[test]
    fn parse_slash_symbol() {
        let code = parse_tile_code_line(1, "\\?ladder /").unwrap();
        assert_eq!(code.symbol, sym('/'));
        let code = parse_tile_code_line(1, "\\?ladder / //c").unwrap();
        assert_eq!(code.symbol, sym('/'));
        assert_eq!(code.comment, "c");
    }

    #[test]
    fn parse_rejects_long_symbol() {
        let err = parse_tile_code_line(9, "\\?floor 12").unwrap_err();
        assert!(matches!(err, LevelParseError::Parse { line: 9, .. }));
        assert!(parse_tile_code_line(2, "\\?floor").is_err());
        assert!(parse_tile_code_line(2, "\\?floor    ").is_err());
    }

    #[test]
    fn format_round_trips() {
        let line = "\\?push_block            4";
        let code = parse_tile_code_line(1, line).unwrap();
        assert_eq!(format_tile_code_line(&code), line);
        let line = "\\?minewood_floor_hanging_hide é // long";
        let code = parse_tile_code_line(1, line).unwrap();
        assert_eq!(format_tile_code_line(&code), line);
    }

    #[test]
    fn define_rejects_duplicates_and_unknown_names() {
        let mut t = table(&[("floor", '1')]);
        let mut alloc = t.allocator();
        let vocab = Vocabulary::builtin();
        assert_eq!(
            t.define(&mut alloc, &vocab, TileCode::new(sym('1'), "door")),
            Err(TileCodeError::DuplicateSymbol(sym('1')))
        );
        assert_eq!(
            t.define(&mut alloc, &vocab, TileCode::new(sym('2'), "no_such_tile")),
            Err(TileCodeError::UnknownTileName("no_such_tile".into()))
        );
        assert_eq!(t.len(), 1);
        assert!(alloc.is_free(sym('2')));
        t.define(&mut alloc, &vocab, TileCode::new(sym('2'), "door")).unwrap();
        assert!(!alloc.is_free(sym('2')));
    }

    #[test]
    fn add_takes_lowest_free_symbol() {
        let mut t = table(&[("empty", '0'), ("floor", '!')]);
        let mut alloc = t.allocator();
        let vocab = Vocabulary::builtin();
        let code = t
            .add(&mut alloc, &vocab, &BlendedTileCode::new("floor", 50, "push_block"), "")
            .unwrap();
        assert_eq!(code.symbol, sym('"'));
        assert_eq!(code.tile_name, "floor%50%push_block");
        assert_eq!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::new("floor", 50, "push_block"), ""),
            Err(TileCodeError::DuplicateTileCode {
                expr: "floor%50%push_block".into(),
                symbol: sym('"')
            })
        );
    }

    #[test]
    fn add_spots_differently_spelled_duplicates() {
        let mut t = table(&[("empty", '0'), ("floor%50%empty", 'a'), ("door%100", 'b')]);
        let mut alloc = t.allocator();
        let vocab = Vocabulary::builtin();
        assert_eq!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::new("floor", 50, "empty"), ""),
            Err(TileCodeError::DuplicateTileCode {
                expr: "floor%50".into(),
                symbol: sym('a')
            })
        );
        assert!(matches!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::solid("door"), ""),
            Err(TileCodeError::DuplicateTileCode { symbol, .. }) if symbol == sym('b')
        ));
        assert!(matches!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::new("empty", 100, "floor"), ""),
            Err(TileCodeError::DuplicateTileCode { symbol, .. }) if symbol == sym('0')
        ));
        assert_eq!(alloc, t.allocator());
    }

    #[test]
    fn add_validates_secondary() {
        let mut t = TileCodeTable::new();
        let mut alloc = t.allocator();
        let vocab = Vocabulary::builtin();
        assert_eq!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::new("floor", 50, "nope"), ""),
            Err(TileCodeError::UnknownTileName("nope".into()))
        );
        assert_eq!(alloc, SymbolAllocator::new());
    }

    #[test]
    fn add_reports_exhaustion() {
        let mut t = TileCodeTable::new();
        let mut alloc = SymbolAllocator::from_used(lvlforge_types::alphabet().iter().copied());
        let vocab = Vocabulary::builtin();
        assert_eq!(
            t.add(&mut alloc, &vocab, &BlendedTileCode::solid("floor"), ""),
            Err(TileCodeError::AllocatorExhausted)
        );
        assert!(t.is_empty());
    }

    #[test]
    fn undefine_releases() {
        let mut t = table(&[("empty", '0'), ("floor", 'X')]);
        let mut alloc = t.allocator();
        let removed = t.undefine(&mut alloc, sym('X')).unwrap();
        assert_eq!(removed.code.tile_name, "floor");
        assert!(alloc.is_free(sym('X')));
        assert_eq!(
            t.undefine(&mut alloc, sym('X')),
            Err(TileCodeError::UndefinedSymbol(sym('X')))
        );
        assert_eq!(
            t.undefine(&mut alloc, Symbol::AIR),
            Err(TileCodeError::ReservedSymbol(Symbol::AIR))
        );
    }

    #[test]
    fn own_codes_shadow_inherited() {
        let mut t = TileCodeTable::new();
        let dep = TileCodeOrigin::Inherited("generic.lvl".into());
        assert!(t.inherit(TileCode::new(sym('1'), "floor"), dep.clone()));
        assert!(t.inherit(TileCode::new(sym('2'), "door"), dep.clone()));
        t.insert_own(TileCode::new(sym('1'), "stone_floor")).unwrap();
        assert!(!t.inherit(TileCode::new(sym('1'), "floor"), dep));
        assert_eq!(t.get(sym('1')).unwrap().code.tile_name, "stone_floor");
        let own: Vec<&str> = t.own().map(|c| c.tile_name.as_str()).collect();
        assert_eq!(own, vec!["stone_floor"]);
        assert_eq!(t.inherited().count(), 1);
    }

    #[test]
    fn later_inheritance_wins() {
        let mut t = TileCodeTable::new();
        t.inherit(
            TileCode::new(sym('a'), "floor"),
            TileCodeOrigin::Inherited("generic.lvl".into()),
        );
        t.inherit(
            TileCode::new(sym('a'), "jungle_floor"),
            TileCodeOrigin::Inherited("junglearea.lvl".into()),
        );
        let entry = t.get(sym('a')).unwrap();
        assert_eq!(entry.code.tile_name, "jungle_floor");
        assert_eq!(entry.origin, TileCodeOrigin::Inherited("junglearea.lvl".into()));
    }

    #[test]
    fn duplicate_own_is_refused() {
        let mut t = table(&[("floor", '1')]);
        assert_eq!(
            t.insert_own(TileCode::new(sym('1'), "door")),
            Err(TileCodeError::DuplicateSymbol(sym('1')))
        );
    }

    #[test]
    fn resolve_cells() {
        let t = table(&[("dirt%75%stone", 'd'), ("dirt%75", 'e'), ("dirt", 'f')]);
        assert_eq!(t.resolve(sym('d')).unwrap(), BlendedTileCode::new("dirt", 75, "stone"));
        assert_eq!(t.resolve(sym('e')).unwrap().secondary, "empty");
        assert_eq!(t.resolve(sym('f')).unwrap().percent, 100);
        assert_eq!(t.resolve(sym('g')), Err(TileCodeError::UndefinedSymbol(sym('g'))));
    }
}
