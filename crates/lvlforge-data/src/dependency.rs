//! Tile code inheritance between level files.
//!
//! Most level files use tile codes they do not define themselves; the game
//! loads them alongside a shared file and, for some areas, an area file. Which
//! files a level leans on is decided by its name.

use lvlforge_types::{Symbol, TileCode, TileCodeOrigin};

use crate::level_file::{LevelFile, LevelWarning};
use crate::store::{LevelStore, load_level};

pub const GENERIC_LEVEL: &str = "generic.lvl";

/// Name prefixes and the area file they depend on. First match wins.
const AREA_DEPENDENCIES: &[(&[&str], &str)] = &[
    (&["base"], "basecamp.lvl"),
    (&["cave"], "dwellingarea.lvl"),
    (&["blackmark", "beehive", "challenge_moon"], "junglearea.lvl"),
    (&["vlads"], "volcanoarea.lvl"),
    (&["lake", "challenge_star"], "tidepoolarea.lvl"),
    (&["hallofush", "babylonarea_1", "palace"], "babylonarea.lvl"),
    (&["challenge_sun"], "sunkencityarea.lvl"),
    (&["end"], "ending.lvl"),
];

/// Codes the generic file relies on without defining them.
const IMPLIED_GENERIC_CODES: [(char, &str); 5] = [
    ('4', "push_block"),
    ('t', "treasure"),
    ('1', "floor"),
    ('6', "chunk_air"),
    ('=', "minewood_floor"),
];

/// Files whose tile codes `file_name` inherits, lowest priority first.
pub fn dependencies(file_name: &str) -> Vec<&'static str> {
    let mut deps = Vec::new();
    if !file_name.starts_with("base") {
        deps.push(GENERIC_LEVEL);
    }
    let area = AREA_DEPENDENCIES
        .iter()
        .find(|(prefixes, _)| prefixes.iter().any(|p| file_name.starts_with(p)))
        .map(|(_, dep)| *dep);
    deps.extend(area);
    deps.retain(|dep| *dep != file_name);
    deps
}

/// Built-in codes for files that need them but define them nowhere.
pub fn implied_codes(file_name: &str) -> Vec<TileCode> {
    if !file_name.starts_with("generic") {
        return Vec::new();
    }
    IMPLIED_GENERIC_CODES
        .iter()
        .filter_map(|(c, name)| Symbol::new(*c).ok().map(|s| TileCode::new(s, *name)))
        .collect()
}

/// Pre-populate `level`'s tile code table from the files it depends on.
///
/// Missing or unreadable dependencies are reported and skipped; the level
/// still opens with whatever codes could be found.
pub fn resolve_inheritance(
    level: &mut LevelFile,
    file_name: &str,
    store: &dyn LevelStore,
) -> Vec<LevelWarning> {
    let mut warnings = Vec::new();
    for dep in dependencies(file_name) {
        let warning = match load_level(store, dep) {
            Ok(Some((parsed, origin))) => {
                let mut count = 0;
                for code in parsed.value.tile_codes.own() {
                    let inherited = TileCodeOrigin::Inherited(dep.to_string());
                    if level.tile_codes.inherit(code.clone(), inherited) {
                        count += 1;
                    }
                }
                log::debug!("inherited {count} tile codes from {dep} ({origin})");
                continue;
            }
            Ok(None) => LevelWarning::MissingDependency {
                name: dep.to_string(),
            },
            Err(e) => LevelWarning::UnreadableDependency {
                name: dep.to_string(),
                reason: e.to_string(),
            },
        };
        log::warn!("{warning}");
        warnings.push(warning);
    }
    for code in implied_codes(file_name) {
        if !level.tile_codes.contains(code.symbol) {
            level.tile_codes.inherit(code, TileCodeOrigin::Implied);
        }
    }
    warnings
}
