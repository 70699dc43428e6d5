//! The closed set of tile names a tile code may refer to.

use std::collections::BTreeSet;

/// Source of valid tile names.
pub trait TileVocabulary {
    fn contains(&self, name: &str) -> bool;
}

/// Tile names known to the game's level loader.
pub const BUILTIN_TILE_NAMES: &[&str] = &[
    "adjacent_floor",
    "alien",
    "alien_generator",
    "alienqueen",
    "altar",
    "ammit",
    "ankh",
    "anubis",
    "apep",
    "apep_left",
    "apep_right",
    "arrow_trap",
    "autowalltorch",
    "babylon_floor",
    "bat",
    "bat_flying",
    "bee",
    "beehive_floor",
    "bigspear_trap",
    "bodyguard",
    "bone_block",
    "bunkbed",
    "bush_block",
    "catmummy",
    "caveman",
    "caveman_asleep",
    "cavemanboss",
    "cavemanshopkeeper",
    "chain_ceiling",
    "chainandblocks_ceiling",
    "chair_looking_left",
    "chair_looking_right",
    "chalice",
    "chunk_air",
    "chunk_door",
    "chunk_ground",
    "climbing_gloves",
    "clover",
    "cobra",
    "cobweb",
    "cog_floor",
    "conveyorbelt_left",
    "conveyorbelt_right",
    "cooked_turkey",
    "couch",
    "crate",
    "crate_bombs",
    "crate_parachute",
    "crate_ropes",
    "crocman",
    "crossbow",
    "crown_statue",
    "crushing_elevator",
    "crushtraplarge",
    "cursed_pot",
    "diningtable",
    "dm_spawn_point",
    "dog_sign",
    "door",
    "door2",
    "door2_secret",
    "door_drop_held",
    "dresser",
    "drill",
    "duat_floor",
    "dustwall",
    "egg_ship_door",
    "egg_ship_entrance",
    "eggplant_altar",
    "eggplant_child",
    "eggplant_door",
    "elevator",
    "empress_grave",
    "empty",
    "empty_mech",
    "entrance",
    "entrance_shortcut",
    "excalibur_stone",
    "exit",
    "factory_generator",
    "falling_platform",
    "firefrog",
    "fireworks",
    "floor",
    "floor_hard",
    "floormisc",
    "forcefield",
    "forcefield_top",
    "fountain_drain",
    "fountain_head",
    "frog",
    "frog_orange",
    "generator",
    "ghist_door2",
    "ghist_shopkeeper",
    "giant_frog",
    "giant_spider",
    "giantclam",
    "goldbars",
    "growable_climbing_vine",
    "growable_vine",
    "guts_floor",
    "haunted_corpse",
    "hermitcrab",
    "honey_downwards",
    "honey_upwards",
    "houyibow",
    "humphead",
    "icefloor",
    "idol",
    "idol_floor",
    "idol_hold",
    "imp",
    "jiangshi",
    "jumpdog",
    "jungle_floor",
    "jungle_spear_trap",
    "key",
    "kingu",
    "ladder",
    "ladder_plat",
    "lamassu",
    "lamp_hang",
    "landmine",
    "laser_trap",
    "lava",
    "lavamander",
    "leprechaun",
    "lightarrow",
    "lion_trap",
    "litwalltorch",
    "locked_door",
    "lockedchest",
    "madametusk",
    "mantrap",
    "mattock",
    "merchant",
    "minewood_floor",
    "minewood_floor_hanging_hide",
    "minewood_floor_noreplace",
    "minister",
    "moai_statue",
    "mosquito",
    "mother_statue",
    "mothership_floor",
    "mummy",
    "mushroom_base",
    "necromancer",
    "nonreplaceable_babylon_floor",
    "nonreplaceable_floor",
    "octopus",
    "oldhunter",
    "olmec",
    "olmecship",
    "olmite",
    "osiris",
    "palace_bookcase",
    "palace_candle",
    "palace_chandelier",
    "palace_entrance",
    "palace_floor",
    "palace_table",
    "palace_table_tray",
    "pen_floor",
    "pen_locked_door",
    "pillar",
    "pipe",
    "plasma_cannon",
    "platform",
    "pot",
    "potofgold",
    "powder_keg",
    "push_block",
    "quicksand",
    "regenerating_block",
    "robot",
    "rock",
    "royal_jelly",
    "scorpion",
    "shop_door",
    "shop_item",
    "shop_pagodawall",
    "shop_sign",
    "shop_wall",
    "shop_woodwall",
    "shopkeeper",
    "shopkeeper_vat",
    "shortcut_station_banner",
    "sidetable",
    "singlebed",
    "sister",
    "skeleton",
    "skull",
    "skull_drop_trap",
    "slidingwall_ceiling",
    "slidingwall_switch",
    "snake",
    "snap_trap",
    "sorceress",
    "sparktrap",
    "spider",
    "spike_ball",
    "spikes",
    "spring_trap",
    "stagnant_lava",
    "starting_exit",
    "sticky_trap",
    "stone_floor",
    "storage_floor",
    "storage_guy",
    "sunken_floor",
    "surface_floor",
    "surface_hidden_floor",
    "telescope",
    "temple_floor",
    "thief",
    "thinice",
    "thorn_vine",
    "tiamat",
    "tikiman",
    "timed_forcefield",
    "timed_powder_keg",
    "tomb_floor",
    "totem_trap",
    "treasure",
    "treasure_chest",
    "treasure_vaultchest",
    "tree_base",
    "tun",
    "tutorial_menu_sign",
    "tutorial_speedrun_sign",
    "ufo",
    "upsidedown_spikes",
    "ushabti",
    "vampire",
    "vault_wall",
    "venom_hose",
    "vine",
    "vlad",
    "vlad_floor",
    "walltorch",
    "water",
    "witchdoctor",
    "woodenlog_trap",
    "woodenlog_trap_ceiling",
    "yama",
    "yang",
    "yeti",
    "zoo_exhibit",
];

/// The built-in names, optionally extended with names the game accepts but
/// this list does not know about.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    extra: BTreeSet<String>,
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra: extra.into_iter().map(Into::into).collect(),
        }
    }

    /// All names, built-in first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        BUILTIN_TILE_NAMES
            .iter()
            .copied()
            .chain(self.extra.iter().map(String::as_str))
    }
}

impl TileVocabulary for Vocabulary {
    fn contains(&self, name: &str) -> bool {
        BUILTIN_TILE_NAMES.binary_search(&name).is_ok() || self.extra.contains(name)
    }
}
