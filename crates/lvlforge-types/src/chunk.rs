use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::grid::{Grid, GridError};
use crate::room_tag::{RoomTag, TAG_PREFIX};
use crate::section::Section;
use crate::symbol::Symbol;

/// Which half of a dual room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Foreground,
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("room is not dual, it has no background layer")]
    NoBackground,
    #[error("clearing the dual tag drops the background layer; discard it explicitly")]
    BackgroundWouldBeLost,
    #[error("dual tag and background layer disagree")]
    DualMismatch,
    #[error("row {row} would start with {start:?} and read back as something other than a room row")]
    ReservedRowStart { row: usize, start: String },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// The first two symbols of `row` as a string, when a line starting with them
/// is read as a comment, a room tag or a section entry.
fn reserved_row_start(row: &[Symbol]) -> Option<String> {
    let start: String = row.iter().take(2).map(|s| s.as_char()).collect();
    let reserved = start == "//" || start == TAG_PREFIX || Section::from_line(&start).is_some();
    reserved.then_some(start)
}

fn check_row_starts(grid: &Grid) -> Result<(), ChunkError> {
    grid.rows()
        .iter()
        .enumerate()
        .find_map(|(row, cells)| reserved_row_start(cells).map(|start| (row, start)))
        .map_or(Ok(()), |(row, start)| Err(ChunkError::ReservedRowStart { row, start }))
}

/// One room: an optional comment, its tags, and one or two symbol grids.
///
/// The background grid exists exactly when the room carries [`RoomTag::Dual`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    /// Raw text after the `//` marker of the room's leading comment line.
    pub comment: String,
    tags: Vec<RoomTag>,
    foreground: Grid,
    background: Option<Grid>,
}

impl Chunk {
    pub fn new(comment: impl Into<String>, foreground: Grid) -> Self {
        Self {
            comment: comment.into(),
            tags: Vec::new(),
            foreground,
            background: None,
        }
    }

    /// Assemble a chunk from parsed parts. Tags keep the given order.
    ///
    /// Only the foreground row starts are checked against reserved prefixes; a
    /// background half never begins a line.
    pub fn from_parts(
        comment: impl Into<String>,
        tags: Vec<RoomTag>,
        foreground: Grid,
        background: Option<Grid>,
    ) -> Result<Self, ChunkError> {
        if tags.contains(&RoomTag::Dual) != background.is_some() {
            return Err(ChunkError::DualMismatch);
        }
        if let Some(bg) = &background {
            if bg.height() != foreground.height() {
                return Err(GridError::LayerHeight {
                    expected: foreground.height(),
                    found: bg.height(),
                }
                .into());
            }
        }
        check_row_starts(&foreground)?;
        let mut deduped = Vec::with_capacity(tags.len());
        for tag in tags {
            if !deduped.contains(&tag) {
                deduped.push(tag);
            }
        }
        Ok(Self {
            comment: comment.into(),
            tags: deduped,
            foreground,
            background,
        })
    }

    /// A new room of the given size filled with air.
    pub fn blank(size: RoomSize) -> Self {
        let (width, height) = size.dimensions();
        Self::new(" new room", Grid::filled(width, height, Symbol::AIR))
    }

    /// Display name: the trimmed comment, or `room` when there is none.
    pub fn name(&self) -> &str {
        match self.comment.trim() {
            "" => "room",
            name => name,
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.comment = format!(" {name}");
    }

    pub fn tags(&self) -> &[RoomTag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: RoomTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_dual(&self) -> bool {
        self.background.is_some()
    }

    /// Set or clear a tag. Setting [`RoomTag::Dual`] converts the room; clearing
    /// it is refused, see [`Chunk::discard_background`].
    pub fn set_tag(&mut self, tag: RoomTag, on: bool) -> Result<(), ChunkError> {
        match (tag, on) {
            (RoomTag::Dual, true) => self.make_dual(),
            (RoomTag::Dual, false) if self.is_dual() => {
                return Err(ChunkError::BackgroundWouldBeLost);
            }
            (_, true) => self.insert_tag(tag),
            (_, false) => self.tags.retain(|t| *t != tag),
        }
        Ok(())
    }

    fn insert_tag(&mut self, tag: RoomTag) {
        if self.has_tag(tag) {
            return;
        }
        let pos = self
            .tags
            .iter()
            .position(|t| *t > tag)
            .unwrap_or(self.tags.len());
        self.tags.insert(pos, tag);
    }

    /// Convert to a dual room with an all-air background of the same shape.
    /// No-op on a room that is already dual.
    pub fn make_dual(&mut self) {
        if self.is_dual() {
            return;
        }
        self.background = Some(self.foreground.same_shape(Symbol::AIR));
        self.insert_tag(RoomTag::Dual);
    }

    /// Convert back to a single-layer room. The background is removed and
    /// handed back; it is not kept anywhere else.
    pub fn discard_background(&mut self) -> Option<Grid> {
        self.tags.retain(|t| *t != RoomTag::Dual);
        self.background.take()
    }

    pub fn foreground(&self) -> &Grid {
        &self.foreground
    }

    pub fn background(&self) -> Option<&Grid> {
        self.background.as_ref()
    }

    pub fn layer(&self, layer: Layer) -> Option<&Grid> {
        match layer {
            Layer::Foreground => Some(&self.foreground),
            Layer::Background => self.background.as_ref(),
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> Result<&mut Grid, ChunkError> {
        match layer {
            Layer::Foreground => Ok(&mut self.foreground),
            Layer::Background => self.background.as_mut().ok_or(ChunkError::NoBackground),
        }
    }

    pub fn grids(&self) -> impl Iterator<Item = &Grid> {
        std::iter::once(&self.foreground).chain(self.background.as_ref())
    }

    /// Place `symbol` in one cell, returning the previous symbol.
    ///
    /// Refused, with the cell left as it was, when the row would begin like a
    /// comment, tag or section entry line.
    pub fn set_cell(
        &mut self,
        layer: Layer,
        row: usize,
        col: usize,
        symbol: Symbol,
    ) -> Result<Symbol, ChunkError> {
        let grid = self.layer_mut(layer)?;
        let previous = grid.set(row, col, symbol)?;
        if layer == Layer::Foreground && col < 2 {
            if let Some(start) = grid.rows().get(row).and_then(|cells| reserved_row_start(cells)) {
                grid.set(row, col, previous)?;
                return Err(ChunkError::ReservedRowStart { row, start });
            }
        }
        Ok(previous)
    }

    /// Fill every layer with air.
    pub fn clear(&mut self) {
        self.foreground.fill(Symbol::AIR);
        if let Some(bg) = &mut self.background {
            bg.fill(Symbol::AIR);
        }
    }

    /// Substitute `old` with `new` in both layers. Nothing changes when
    /// [`Chunk::check_replace`] refuses.
    pub fn replace_symbol(&mut self, old: Symbol, new: Symbol) -> Result<usize, ChunkError> {
        self.check_replace(old, new)?;
        Ok(self.substitute(old, new))
    }

    /// Whether substituting `old` with `new` keeps every row start readable.
    pub fn check_replace(&self, old: Symbol, new: Symbol) -> Result<(), ChunkError> {
        for (row, cells) in self.foreground.rows().iter().enumerate() {
            let start: Vec<Symbol> = cells
                .iter()
                .take(2)
                .map(|&s| if s == old { new } else { s })
                .collect();
            if let Some(start) = reserved_row_start(&start) {
                return Err(ChunkError::ReservedRowStart { row, start });
            }
        }
        Ok(())
    }

    /// Replace `symbol` with air in both layers.
    pub fn clear_symbol(&mut self, symbol: Symbol) -> usize {
        self.substitute(symbol, Symbol::AIR)
    }

    fn substitute(&mut self, old: Symbol, new: Symbol) -> usize {
        let mut count = self.foreground.replace(old, new);
        if let Some(bg) = &mut self.background {
            count += bg.replace(old, new);
        }
        count
    }

    pub fn contains_symbol(&self, symbol: Symbol) -> bool {
        self.grids().any(|g| g.symbols().any(|s| s == symbol))
    }

    /// Check the width invariants: uniform rows per layer, matching layer widths.
    pub fn validate(&self) -> Result<(), GridError> {
        let width = self.foreground.check_uniform()?;
        if let Some(bg) = &self.background {
            let bg_width = bg.check_uniform()?;
            if bg_width != width {
                return Err(GridError::LayerWidth {
                    expected: width,
                    found: bg_width,
                });
            }
        }
        Ok(())
    }

    /// A copy whose name is marked as a copy.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.comment.push_str(" COPY");
        copy
    }
}

/// Standard room sizes offered when adding a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RoomSize {
    Normal,
    MachineWideroom,
    MachineTallroom,
    MachineBigroom,
    Ghistroom,
    Feeling,
    ChunkGround,
    ChunkDoor,
    ChunkAir,
    Cache,
}

impl RoomSize {
    /// `(width, height)` in tiles.
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Normal => (10, 8),
            Self::MachineWideroom => (20, 8),
            Self::MachineTallroom => (10, 16),
            Self::MachineBigroom => (20, 16),
            Self::Ghistroom => (5, 5),
            Self::Feeling => (20, 16),
            Self::ChunkGround => (5, 3),
            Self::ChunkDoor => (6, 3),
            Self::ChunkAir => (5, 3),
            Self::Cache => (5, 5),
        }
    }

    /// Guess the size for a new room from its template's name.
    pub fn for_template(template_name: &str) -> Self {
        Self::iter()
            .find(|size| template_name.starts_with(&size.to_string()))
            .unwrap_or(Self::Normal)
    }
}
