//! Settings for the command line front end.
//!
//! Read from an optional `lvlforge.toml`, then from `LVLFORGE_*` environment
//! variables, e.g. `LVLFORGE_EXTRACTS_DIR`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use lvlforge_data::FsLevelStore;
use lvlforge_types::Vocabulary;
use serde::Deserialize;

const DEFAULT_FILE: &str = "lvlforge";
const ENV_PREFIX: &str = "LVLFORGE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level files extracted from the game. Never written to.
    pub extracts_dir: Option<PathBuf>,
    /// Where edited files are saved.
    pub overrides_dir: PathBuf,
    /// Tile names to accept on top of the built-in list.
    pub extra_tile_names: Vec<String>,
    /// `env_logger` filter used when no `-v` is given.
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extracts_dir: None,
            overrides_dir: PathBuf::from("Overrides"),
            extra_tile_names: Vec::new(),
            log_level: None,
        }
    }
}

impl Settings {
    /// Load from `path`, which must exist, or from `lvlforge.toml` in the
    /// working directory when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extra_tile_names"),
            )
            .build()?
            .try_deserialize()
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::with_extra(self.extra_tile_names.iter().cloned())
    }

    pub fn store(&self) -> FsLevelStore {
        FsLevelStore::new(&self.overrides_dir, self.extracts_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvlforge_types::TileVocabulary;

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "extracts_dir = \"game/Data/Levels\"\n\
             extra_tile_names = [\"modded_block\"]\n\
             log_level = \"debug\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).expect("load");
        assert_eq!(settings.extracts_dir, Some(PathBuf::from("game/Data/Levels")));
        assert_eq!(settings.overrides_dir, PathBuf::from("Overrides"));
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert!(settings.vocabulary().contains("modded_block"));
        assert!(settings.vocabulary().contains("floor"));
    }

    #[test]
    fn explicit_file_must_exist() {
        assert!(Settings::load(Some(Path::new("/nonexistent/lvlforge.toml"))).is_err());
    }
}
