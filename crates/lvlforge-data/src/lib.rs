//! Reading, editing and writing Spelunky 2 `.lvl` files.
//!
//! [`LevelFile`] is the document model and its text codec. [`EditSession`]
//! wraps one open file with a [`SymbolAllocator`] so tile code edits and grid
//! edits stay consistent. Files are found and stored through a
//! [`LevelStore`].

pub mod allocator;
pub mod dependency;
pub mod encoding;
pub mod kv_codec;
pub mod level_file;
pub mod room_codec;
pub mod session;
pub mod store;
pub mod templates;
pub mod tile_codes;

pub use allocator::{AllocError, SymbolAllocator};
pub use dependency::{dependencies, resolve_inheritance};
pub use encoding::EncodingError;
pub use level_file::{LevelFile, LevelParseError, LevelWarning, LineEnding, Parsed};
pub use session::{EditSession, SessionError};
pub use store::{
    FsLevelStore, LevelOrigin, LevelStore, LoadError, MemoryLevelStore, StoreError, load_level,
};
pub use tile_codes::{TileCodeEntry, TileCodeError, TileCodeTable};
