//! An editing session over one open level file.
//!
//! The session owns the level, the symbol allocator derived from its tile
//! codes, and the tile vocabulary used to validate new codes. Every edit goes
//! through it so the allocator never drifts from the table. Edits that are
//! rejected leave the level untouched.

use lvlforge_types::{
    Biome, BlendedTileCode, Chunk, ChunkError, Grid, KeyValueEntry, Layer, LevelTemplate, RoomSize,
    RoomTag, Section, Symbol, TemplateError, TileCode, TileVocabulary, Vocabulary,
};

use crate::allocator::SymbolAllocator;
use crate::dependency::{dependencies, resolve_inheritance};
use crate::encoding::{self, EncodingError};
use crate::level_file::{LevelFile, LevelParseError, LevelWarning, Parsed};
use crate::room_codec;
use crate::store::{LevelOrigin, LevelStore, LoadError, StoreError, load_level};
use crate::tile_codes::{TileCodeEntry, TileCodeError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} not found in overrides or extracts")]
    NotFound(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Parse(#[from] LevelParseError),
    #[error(transparent)]
    TileCode(#[from] TileCodeError),
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("no template named {0}")]
    NoSuchTemplate(String),
    #[error("{0} is not a key-value section")]
    NotAKeyValueSection(Section),
    #[error("{section} has no entry {index}")]
    NoSuchEntry { section: Section, index: usize },
}

pub struct EditSession {
    name: String,
    origin: LevelOrigin,
    level: LevelFile,
    allocator: SymbolAllocator,
    vocabulary: Vocabulary,
    warnings: Vec<LevelWarning>,
    dirty: bool,
}

impl EditSession {
    /// Open `name` from `store`, pulling in the tile codes of its dependencies.
    pub fn open(
        store: &dyn LevelStore,
        name: &str,
        vocabulary: Vocabulary,
    ) -> Result<Self, SessionError> {
        let (parsed, origin) =
            load_level(store, name)?.ok_or_else(|| SessionError::NotFound(name.to_string()))?;
        Ok(Self::from_parsed(store, name, parsed, origin, vocabulary))
    }

    /// Start a new, empty level called `name`.
    pub fn create(store: &dyn LevelStore, name: &str, vocabulary: Vocabulary) -> Self {
        let parsed = Parsed {
            value: LevelFile::new(),
            warnings: Vec::new(),
        };
        Self::from_parsed(store, name, parsed, LevelOrigin::Overrides, vocabulary)
    }

    fn from_parsed(
        store: &dyn LevelStore,
        name: &str,
        parsed: Parsed<LevelFile>,
        origin: LevelOrigin,
        vocabulary: Vocabulary,
    ) -> Self {
        let Parsed {
            value: mut level,
            mut warnings,
        } = parsed;
        warnings.extend(resolve_inheritance(&mut level, name, store));
        let allocator = level.tile_codes.allocator();
        log::debug!(
            "opened {name} from {origin}: {} tile codes, {} free symbols",
            level.tile_codes.len(),
            allocator.free_count()
        );
        Self {
            name: name.to_string(),
            origin,
            level,
            allocator,
            vocabulary,
            warnings,
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> LevelOrigin {
        self.origin
    }

    pub fn level(&self) -> &LevelFile {
        &self.level
    }

    pub fn warnings(&self) -> &[LevelWarning] {
        &self.warnings
    }

    pub fn allocator(&self) -> &SymbolAllocator {
        &self.allocator
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn biome(&self) -> Biome {
        Biome::from_file_name(&self.name)
    }

    pub fn dependencies(&self) -> Vec<&'static str> {
        dependencies(&self.name)
    }

    /// Where a save lands. Extracted files are never written in place.
    pub fn save_target(&self) -> LevelOrigin {
        LevelOrigin::Overrides
    }

    pub fn serialize(&self) -> String {
        self.level.serialize()
    }

    /// Write the level back through `store`.
    pub fn save(&mut self, store: &mut dyn LevelStore) -> Result<LevelOrigin, SessionError> {
        let bytes = encoding::encode(&self.serialize())?;
        store.write(&self.name, &bytes)?;
        self.origin = self.save_target();
        self.dirty = false;
        Ok(self.origin)
    }

    fn touch<T>(&mut self, value: T) -> T {
        self.dirty = true;
        value
    }

    // Tile codes.

    /// Author a tile code from a blend and give it the lowest free symbol.
    pub fn add_tile_code(
        &mut self,
        blend: &BlendedTileCode,
        comment: &str,
    ) -> Result<TileCode, SessionError> {
        let code = self
            .level
            .tile_codes
            .add(&mut self.allocator, &self.vocabulary, blend, comment)?;
        Ok(self.touch(code))
    }

    /// Bind a specific symbol.
    pub fn define_tile_code(&mut self, code: TileCode) -> Result<(), SessionError> {
        self.level
            .tile_codes
            .define(&mut self.allocator, &self.vocabulary, code)?;
        self.touch(());
        Ok(())
    }

    /// Remove a tile code and clear its symbol from every room. Returns the
    /// removed entry and the number of cells cleared.
    pub fn remove_tile_code(&mut self, symbol: Symbol) -> Result<(TileCodeEntry, usize), SessionError> {
        let entry = self.level.tile_codes.undefine(&mut self.allocator, symbol)?;
        let cleared = self.level.delete_symbol_everywhere(symbol);
        log::debug!("removed {} ({}), cleared {cleared} cells", symbol, entry.code.tile_name);
        Ok(self.touch((entry, cleared)))
    }

    fn check_placeable(&self, symbol: Symbol) -> Result<(), SessionError> {
        if symbol.is_air() || self.level.tile_codes.contains(symbol) {
            Ok(())
        } else {
            Err(TileCodeError::UndefinedSymbol(symbol).into())
        }
    }

    /// Substitute `old` with `new` in every room. `new` must have a tile code,
    /// and no room row may end up starting like an entry line.
    pub fn replace_symbol(&mut self, old: Symbol, new: Symbol) -> Result<usize, SessionError> {
        self.check_placeable(new)?;
        let count = self.level.replace_symbol_everywhere(old, new)?;
        Ok(self.touch(count))
    }

    // Rooms.

    fn template_mut(&mut self, template: &str) -> Result<&mut LevelTemplate, SessionError> {
        self.level
            .template_mut(template)
            .ok_or_else(|| SessionError::NoSuchTemplate(template.to_string()))
    }

    fn room_mut(&mut self, template: &str, room: usize) -> Result<&mut Chunk, SessionError> {
        let t = self.template_mut(template)?;
        let len = t.chunks.len();
        t.chunk_mut(room).ok_or_else(|| {
            TemplateError::NoSuchChunk {
                template: template.to_string(),
                index: room,
                len,
            }
            .into()
        })
    }

    pub fn set_cell(
        &mut self,
        template: &str,
        room: usize,
        layer: Layer,
        (row, col): (usize, usize),
        symbol: Symbol,
    ) -> Result<Symbol, SessionError> {
        self.check_placeable(symbol)?;
        let previous = self.room_mut(template, room)?.set_cell(layer, row, col, symbol)?;
        Ok(self.touch(previous))
    }

    pub fn set_tag(
        &mut self,
        template: &str,
        room: usize,
        tag: RoomTag,
        on: bool,
    ) -> Result<(), SessionError> {
        self.room_mut(template, room)?.set_tag(tag, on)?;
        self.touch(());
        Ok(())
    }

    /// Turn a dual room back into a single-layer one. The background is lost.
    pub fn discard_background(&mut self, template: &str, room: usize) -> Result<Option<Grid>, SessionError> {
        let bg = self.room_mut(template, room)?.discard_background();
        Ok(self.touch(bg))
    }

    pub fn clear_room(&mut self, template: &str, room: usize) -> Result<(), SessionError> {
        self.room_mut(template, room)?.clear();
        self.touch(());
        Ok(())
    }

    pub fn rename_room(&mut self, template: &str, room: usize, name: &str) -> Result<(), SessionError> {
        self.room_mut(template, room)?.rename(name);
        self.touch(());
        Ok(())
    }

    /// Insert an air-filled room sized for its template. Returns its index.
    pub fn add_room(&mut self, template: &str, index: usize) -> Result<usize, SessionError> {
        let t = self.template_mut(template)?;
        let chunk = Chunk::blank(RoomSize::for_template(&t.name));
        let index = t.add_chunk(index, chunk);
        Ok(self.touch(index))
    }

    pub fn remove_room(&mut self, template: &str, room: usize) -> Result<Chunk, SessionError> {
        let removed = self.template_mut(template)?.remove_chunk(room)?;
        Ok(self.touch(removed))
    }

    pub fn duplicate_room(&mut self, template: &str, room: usize) -> Result<usize, SessionError> {
        let index = self.template_mut(template)?.duplicate_chunk(room)?;
        Ok(self.touch(index))
    }

    pub fn copy_room(&self, template: &str, room: usize) -> Result<String, SessionError> {
        let t = self
            .level
            .template(template)
            .ok_or_else(|| SessionError::NoSuchTemplate(template.to_string()))?;
        let chunk = t.chunk(room).ok_or_else(|| TemplateError::NoSuchChunk {
            template: template.to_string(),
            index: room,
            len: t.chunks.len(),
        })?;
        Ok(room_codec::to_clipboard(chunk))
    }

    /// Insert a room from its clipboard text. Returns its index and any
    /// warnings about its shape.
    pub fn paste_room(
        &mut self,
        template: &str,
        index: usize,
        text: &str,
    ) -> Result<(usize, Vec<LevelWarning>), SessionError> {
        let (chunk, warnings) = room_codec::from_clipboard(text)?;
        let index = self.template_mut(template)?.add_chunk(index, chunk);
        Ok(self.touch((index, warnings)))
    }

    pub fn rename_template(&mut self, template: &str, new_name: &str) -> Result<(), SessionError> {
        self.template_mut(template)?.rename(new_name)?;
        self.touch(());
        Ok(())
    }

    // Rules.

    fn rules_mut(&mut self, section: Section) -> Result<&mut Vec<KeyValueEntry>, SessionError> {
        self.level
            .entries_mut(section)
            .ok_or(SessionError::NotAKeyValueSection(section))
    }

    /// Insert a placeholder rule at `index` (clamped to the end).
    pub fn insert_rule(&mut self, section: Section, index: usize) -> Result<usize, SessionError> {
        let rules = self.rules_mut(section)?;
        let index = index.min(rules.len());
        rules.insert(index, KeyValueEntry::placeholder());
        Ok(self.touch(index))
    }

    pub fn update_rule(
        &mut self,
        section: Section,
        index: usize,
        entry: KeyValueEntry,
    ) -> Result<KeyValueEntry, SessionError> {
        let slot = self
            .rules_mut(section)?
            .get_mut(index)
            .ok_or(SessionError::NoSuchEntry { section, index })?;
        let previous = std::mem::replace(slot, entry);
        Ok(self.touch(previous))
    }

    pub fn remove_rule(&mut self, section: Section, index: usize) -> Result<KeyValueEntry, SessionError> {
        let rules = self.rules_mut(section)?;
        if index >= rules.len() {
            return Err(SessionError::NoSuchEntry { section, index });
        }
        let removed = rules.remove(index);
        Ok(self.touch(removed))
    }

    /// Whether `name` is a tile this session accepts.
    pub fn knows_tile(&self, name: &str) -> bool {
        self.vocabulary.contains(name)
    }
}
