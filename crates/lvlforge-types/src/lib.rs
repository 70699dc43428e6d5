pub mod biome;
pub mod chunk;
pub mod cp1252;
pub mod grid;
pub mod key_value;
pub mod room_tag;
pub mod section;
pub mod symbol;
pub mod template;
pub mod tile_code;
pub mod tile_names;

pub use biome::Biome;
pub use chunk::{Chunk, ChunkError, Layer, RoomSize};
pub use grid::{Grid, GridError};
pub use key_value::KeyValueEntry;
pub use room_tag::RoomTag;
pub use section::Section;
pub use symbol::{ALPHABET_LEN, InvalidSymbol, Symbol, alphabet};
pub use template::{LevelTemplate, TemplateError};
pub use tile_code::{BlendParseError, BlendedTileCode, EMPTY_TILE, TileCode, TileCodeOrigin};
pub use tile_names::{BUILTIN_TILE_NAMES, TileVocabulary, Vocabulary};
