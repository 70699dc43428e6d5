use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Theme a level file is drawn in, derived from its file name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    #[default]
    Cave,
    Tidepool,
    Babylon,
    Beehive,
    Jungle,
    Temple,
    Sunken,
    Gold,
    Duat,
    Eggplant,
    Ice,
    Volcano,
}

enum Match {
    Prefix(&'static str),
    Suffix(&'static str),
}

use Match::{Prefix, Suffix};

/// Checked top to bottom; the first biome with a matching rule wins.
const RULES: &[(Biome, &[Match])] = &[
    (
        Biome::Tidepool,
        &[
            Prefix("abzu.lvl"),
            Prefix("lake"),
            Prefix("tide"),
            Prefix("end"),
            Suffix("_tidepool.lvl"),
        ],
    ),
    (
        Biome::Babylon,
        &[
            Prefix("babylon"),
            Prefix("hallofu"),
            Suffix("_babylon.lvl"),
            Prefix("palace"),
            Prefix("tiamat"),
        ],
    ),
    (Biome::Cave, &[Prefix("basecamp")]),
    (Biome::Beehive, &[Prefix("beehive")]),
    (
        Biome::Jungle,
        &[
            Prefix("blackmark"),
            Prefix("jungle"),
            Prefix("challenge_moon"),
            Suffix("_jungle.lvl"),
        ],
    ),
    (
        Biome::Temple,
        &[
            Prefix("challenge_star"),
            Prefix("temple"),
            Suffix("_temple.lvl"),
        ],
    ),
    (
        Biome::Sunken,
        &[
            Prefix("challenge_sun"),
            Prefix("sunken"),
            Prefix("hundun"),
            Prefix("ending_hard"),
            Suffix("_sunkencity.lvl"),
        ],
    ),
    (Biome::Gold, &[Prefix("city")]),
    (Biome::Duat, &[Prefix("duat")]),
    (Biome::Eggplant, &[Prefix("egg")]),
    (Biome::Ice, &[Prefix("ice"), Suffix("_icecavesarea.lvl")]),
    (Biome::Jungle, &[Prefix("olmec")]),
    (Biome::Volcano, &[Prefix("vlad"), Prefix("volcano"), Suffix("_volcano.lvl")]),
];

impl Biome {
    /// Classify a level file by name. Unrecognised names are drawn as caves.
    pub fn from_file_name(file_name: &str) -> Self {
        RULES
            .iter()
            .find(|(_, rules)| {
                rules.iter().any(|rule| match rule {
                    Prefix(p) => file_name.starts_with(p),
                    Suffix(s) => file_name.ends_with(s),
                })
            })
            .map_or(Self::Cave, |(biome, _)| *biome)
    }
}
