use serde::Serialize;
use strum::{Display, EnumIter};

/// The five sections of a level file, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
pub enum Section {
    #[strum(to_string = "LEVEL SETTINGS")]
    LevelSettings,
    #[strum(to_string = "TILE CODES")]
    TileCodes,
    #[strum(to_string = "LEVEL CHANCES")]
    LevelChances,
    #[strum(to_string = "MONSTER CHANCES")]
    MonsterChances,
    #[strum(to_string = "ROOM TEMPLATES")]
    RoomTemplates,
}

impl Section {
    /// Line prefix introducing an entry of this section.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::LevelSettings => "\\-",
            Self::TileCodes => "\\?",
            Self::LevelChances => "\\%",
            Self::MonsterChances => "\\+",
            Self::RoomTemplates => "\\.",
        }
    }

    /// Section whose entry prefix starts `line`.
    pub fn from_line(line: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|s| line.starts_with(s.prefix()))
    }

    /// Section whose banner title is `title`.
    pub fn from_title(title: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|s| s.to_string() == title)
    }
}
