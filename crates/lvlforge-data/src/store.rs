//! Where level files are read from and written to.
//!
//! Files are looked up by name, first among the user's overrides and then
//! among the files extracted from the game. Writes always go to overrides so
//! extracted files are never modified.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use strum::Display;

use crate::encoding::{self, EncodingError};
use crate::level_file::{LevelFile, LevelParseError, Parsed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LevelOrigin {
    Overrides,
    Extracts,
}

#[derive(Debug)]
pub struct StoredLevel {
    pub bytes: Vec<u8>,
    pub origin: LevelOrigin,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{name}: {source}")]
    Encoding {
        name: String,
        source: EncodingError,
    },
    #[error("{name}: {source}")]
    Parse {
        name: String,
        source: LevelParseError,
    },
}

pub trait LevelStore {
    /// Raw bytes of `name`, or `None` when no location has it.
    fn read(&self, name: &str) -> Result<Option<StoredLevel>, StoreError>;

    /// Store `bytes` under `name` among the overrides.
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Read, decode and parse `name` from `store`.
pub fn load_level(
    store: &dyn LevelStore,
    name: &str,
) -> Result<Option<(Parsed<LevelFile>, LevelOrigin)>, LoadError> {
    let Some(stored) = store.read(name)? else {
        return Ok(None);
    };
    let text = encoding::decode(&stored.bytes).map_err(|source| LoadError::Encoding {
        name: name.to_string(),
        source,
    })?;
    let parsed = LevelFile::parse(&text).map_err(|source| LoadError::Parse {
        name: name.to_string(),
        source,
    })?;
    Ok(Some((parsed, stored.origin)))
}

/// Level files on disk.
#[derive(Debug, Clone)]
pub struct FsLevelStore {
    overrides_dir: PathBuf,
    extracts_dir: Option<PathBuf>,
}

impl FsLevelStore {
    pub fn new(overrides_dir: impl Into<PathBuf>, extracts_dir: Option<PathBuf>) -> Self {
        Self {
            overrides_dir: overrides_dir.into(),
            extracts_dir,
        }
    }

    /// One directory that is both read from and written to. Its files report
    /// [`LevelOrigin::Overrides`].
    pub fn folder(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, None)
    }

    pub fn overrides_dir(&self) -> &Path {
        &self.overrides_dir
    }

    pub fn extracts_dir(&self) -> Option<&Path> {
        self.extracts_dir.as_deref()
    }

    /// Path `name` would be read from, if it exists anywhere.
    pub fn locate(&self, name: &str) -> Option<(PathBuf, LevelOrigin)> {
        let overridden = self.overrides_dir.join(name);
        if overridden.is_file() {
            return Some((overridden, LevelOrigin::Overrides));
        }
        let extracted = self.extracts_dir.as_ref()?.join(name);
        extracted
            .is_file()
            .then_some((extracted, LevelOrigin::Extracts))
    }
}

impl LevelStore for FsLevelStore {
    fn read(&self, name: &str) -> Result<Option<StoredLevel>, StoreError> {
        let Some((path, origin)) = self.locate(name) else {
            log::debug!("{name} not found in overrides or extracts");
            return Ok(None);
        };
        log::debug!("reading {name} from {}", path.display());
        let bytes = std::fs::read(&path).map_err(|source| StoreError::Io { path, source })?;
        Ok(Some(StoredLevel { bytes, origin }))
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.overrides_dir).map_err(|source| StoreError::Io {
            path: self.overrides_dir.clone(),
            source,
        })?;
        let path = self.overrides_dir.join(name);
        log::info!("writing {}", path.display());
        std::fs::write(&path, bytes).map_err(|source| StoreError::Io { path, source })
    }
}

/// An in-memory store with the same lookup order as [`FsLevelStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelStore {
    pub overrides: BTreeMap<String, Vec<u8>>,
    pub extracts: BTreeMap<String, Vec<u8>>,
}

impl MemoryLevelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract(mut self, name: &str, text: &str) -> Self {
        self.extracts.insert(name.to_string(), text.as_bytes().to_vec());
        self
    }

    pub fn with_override(mut self, name: &str, text: &str) -> Self {
        self.overrides.insert(name.to_string(), text.as_bytes().to_vec());
        self
    }
}

impl LevelStore for MemoryLevelStore {
    fn read(&self, name: &str) -> Result<Option<StoredLevel>, StoreError> {
        let found = self
            .overrides
            .get(name)
            .map(|b| (b, LevelOrigin::Overrides))
            .or_else(|| self.extracts.get(name).map(|b| (b, LevelOrigin::Extracts)));
        Ok(found.map(|(bytes, origin)| StoredLevel {
            bytes: bytes.clone(),
            origin,
        }))
    }

    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.overrides.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_extracts() {
        let store = MemoryLevelStore::new()
            .with_extract("cave.lvl", "a")
            .with_override("cave.lvl", "b");
        let got = store.read("cave.lvl").unwrap().unwrap();
        assert_eq!(got.bytes, b"b");
        assert_eq!(got.origin, LevelOrigin::Overrides);
        assert!(store.read("none.lvl").unwrap().is_none());
    }

    #[test]
    fn memory_writes_go_to_overrides() {
        let mut store = MemoryLevelStore::new().with_extract("cave.lvl", "a");
        store.write("cave.lvl", b"c").unwrap();
        assert_eq!(store.extracts["cave.lvl"], b"a");
        assert_eq!(store.read("cave.lvl").unwrap().unwrap().bytes, b"c");
    }

    #[test]
    fn filesystem_lookup_order_and_write() {
        let root = tempfile::tempdir().unwrap();
        let extracts = root.path().join("Extracted");
        let overrides = root.path().join("Overrides");
        std::fs::create_dir_all(&extracts).unwrap();
        std::fs::write(extracts.join("generic.lvl"), b"x").unwrap();

        let mut store = FsLevelStore::new(&overrides, Some(extracts.clone()));
        let got = store.read("generic.lvl").unwrap().unwrap();
        assert_eq!(got.origin, LevelOrigin::Extracts);

        store.write("generic.lvl", b"y").unwrap();
        let got = store.read("generic.lvl").unwrap().unwrap();
        assert_eq!(got.origin, LevelOrigin::Overrides);
        assert_eq!(got.bytes, b"y");
        assert_eq!(std::fs::read(extracts.join("generic.lvl")).unwrap(), b"x");
    }

    #[test]
    fn folder_reads_and_writes_in_place() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("cave.lvl"), b"x").unwrap();

        let mut store = FsLevelStore::folder(root.path());
        assert_eq!(store.extracts_dir(), None);
        let got = store.read("cave.lvl").unwrap().unwrap();
        assert_eq!(got.bytes, b"x");
        assert_eq!(got.origin, LevelOrigin::Overrides);

        store.write("cave.lvl", b"y").unwrap();
        assert_eq!(std::fs::read(root.path().join("cave.lvl")).unwrap(), b"y");
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn load_reports_parse_errors_by_name() {
        let store = MemoryLevelStore::new().with_extract("bad.lvl", "1111\n");
        let err = load_level(&store, "bad.lvl").unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref name, .. } if name == "bad.lvl"));
        assert!(load_level(&store, "missing.lvl").unwrap().is_none());
    }
}
