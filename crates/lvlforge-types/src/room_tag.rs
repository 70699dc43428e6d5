use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Escape prefix of a tag line.
pub const TAG_PREFIX: &str = "\\!";

/// Boolean room flags written as `\!name` lines inside a chunk.
///
/// Declaration order is the canonical emission order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomTag {
    Dual,
    Purge,
    Flip,
    OnlyFlip,
    Rare,
    Hard,
    Liquid,
    Ignore,
}

impl RoomTag {
    /// Recognise a full tag line such as `\!dual`.
    pub fn from_line(line: &str) -> Option<Self> {
        line.strip_prefix(TAG_PREFIX)?.parse().ok()
    }

    /// The tag as it appears on its own line.
    pub fn line(self) -> String {
        format!("{TAG_PREFIX}{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn count() {
        assert_eq!(RoomTag::COUNT, 8);
    }

    #[test]
    fn names() {
        assert_eq!(RoomTag::OnlyFlip.to_string(), "onlyflip");
        assert_eq!(RoomTag::Dual.line(), "\\!dual");
        let s: &'static str = RoomTag::Liquid.into();
        assert_eq!(s, "liquid");
    }

    #[test]
    fn canonical_order() {
        let order: Vec<RoomTag> = RoomTag::iter().collect();
        assert_eq!(
            order,
            vec![
                RoomTag::Dual,
                RoomTag::Purge,
                RoomTag::Flip,
                RoomTag::OnlyFlip,
                RoomTag::Rare,
                RoomTag::Hard,
                RoomTag::Liquid,
                RoomTag::Ignore,
            ]
        );
        assert!(RoomTag::Dual < RoomTag::Ignore);
    }

    #[test]
    fn line_round_trip() {
        for tag in RoomTag::iter() {
            assert_eq!(RoomTag::from_line(&tag.line()), Some(tag));
        }
    }

    #[test]
    fn rejects_near_misses() {
        assert_eq!(RoomTag::from_line("\\!Dual"), None);
        assert_eq!(RoomTag::from_line("\\!dual "), None);
        assert_eq!(RoomTag::from_line("!dual"), None);
        assert_eq!(RoomTag::from_line("\\!only_flip"), None);
    }
}
