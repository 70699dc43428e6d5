use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::symbol::Symbol;

/// Tile name used as the implicit secondary of a blend.
pub const EMPTY_TILE: &str = "empty";

/// A symbol bound to a tile expression, e.g. `\?floor%50%stone  X`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileCode {
    pub symbol: Symbol,
    /// Tile expression as written, `primary[%percent[%secondary]]`.
    pub tile_name: String,
    /// Raw text after the `//` marker, empty when there is none.
    pub comment: String,
}

impl TileCode {
    pub fn new(symbol: Symbol, tile_name: impl Into<String>) -> Self {
        Self {
            symbol,
            tile_name: tile_name.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Interpret the tile expression as a blend.
    pub fn blend(&self) -> Result<BlendedTileCode, BlendParseError> {
        self.tile_name.parse()
    }
}

/// Where a tile code in an editing session came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TileCodeOrigin {
    /// Defined in the file being edited; written back on save.
    Own,
    /// Pre-populated from a dependency file; never written back.
    Inherited(String),
    /// Supplied by the editor because the file relies on it without defining it.
    Implied,
}

/// A weighted choice between two tiles: `percent` of `primary`, the rest
/// `secondary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlendedTileCode {
    pub primary: String,
    pub percent: u8,
    pub secondary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlendParseError {
    #[error("empty tile name in {0:?}")]
    EmptyName(String),
    #[error("invalid percent {percent:?} in {expr:?}, expected 0-100")]
    Percent { expr: String, percent: String },
    #[error("too many '%' fields in {0:?}")]
    TooManyFields(String),
}

impl BlendedTileCode {
    /// A plain, unblended tile.
    pub fn solid(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            percent: 100,
            secondary: EMPTY_TILE.to_string(),
        }
    }

    pub fn new(primary: impl Into<String>, percent: u8, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            percent: percent.min(100),
            secondary: secondary.into(),
        }
    }

    pub fn primary_weight(&self) -> u8 {
        self.percent
    }

    pub fn secondary_weight(&self) -> u8 {
        100 - self.percent
    }

    pub fn is_blend(&self) -> bool {
        self.percent < 100
    }

    /// Whether both place the same tiles at the same odds, however they are
    /// spelled: `floor%100%stone` is `floor`, `floor%0%stone` is `stone`.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.effective() == other.effective()
    }

    fn effective(&self) -> (&str, u8, &str) {
        match self.percent {
            100 => (&self.primary, 100, EMPTY_TILE),
            0 => (&self.secondary, 100, EMPTY_TILE),
            p => (&self.primary, p, &self.secondary),
        }
    }

    /// Tile names this expression references.
    pub fn tile_names(&self) -> impl Iterator<Item = &str> {
        let secondary = self.is_blend().then_some(self.secondary.as_str());
        std::iter::once(self.primary.as_str()).chain(secondary)
    }
}

impl FromStr for BlendedTileCode {
    type Err = BlendParseError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let mut fields = expr.split('%');
        let primary = fields.next().unwrap_or_default();
        if primary.is_empty() {
            return Err(BlendParseError::EmptyName(expr.to_string()));
        }
        let percent = match fields.next() {
            None => 100,
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= 100)
                .ok_or_else(|| BlendParseError::Percent {
                    expr: expr.to_string(),
                    percent: p.to_string(),
                })?,
        };
        let secondary = match fields.next() {
            None => EMPTY_TILE,
            Some("") => return Err(BlendParseError::EmptyName(expr.to_string())),
            Some(s) => s,
        };
        if fields.next().is_some() {
            return Err(BlendParseError::TooManyFields(expr.to_string()));
        }
        Ok(Self {
            primary: primary.to_string(),
            percent,
            secondary: secondary.to_string(),
        })
    }
}

impl fmt::Display for BlendedTileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        if self.is_blend() {
            write!(f, "%{}", self.percent)?;
            if self.secondary != EMPTY_TILE {
                write!(f, "%{}", self.secondary)?;
            }
        }
        Ok(())
    }
}
