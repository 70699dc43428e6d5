use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use lvlforge_data::{EditSession, FsLevelStore, LevelFile, LevelOrigin, LineEnding, SessionError};
use lvlforge_types::{Biome, BlendedTileCode, EMPTY_TILE, Section, TileCodeOrigin};
use serde::Serialize;

use crate::cli::{AddTileArgs, Command, LevelArg};
use crate::config::Settings;

pub fn run(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Check(level) => check(&level, settings),
        Command::Fmt { level, write } => fmt(&level, write, settings),
        Command::Info { level, json } => info(&level, json, settings),
        Command::Tiles(level) => tiles(&level, settings),
        Command::AddTile(args) => add_tile(&args, settings),
        Command::RemoveTile { level, symbol } => edit(&level, settings, |session| {
            let (entry, cleared) = session.remove_tile_code(symbol)?;
            println!(
                "removed {symbol} ({}), cleared {cleared} cells",
                entry.code.tile_name
            );
            Ok(())
        }),
        Command::Replace { level, old, new } => edit(&level, settings, |session| {
            let count = session.replace_symbol(old, new)?;
            println!("replaced {old} with {new} in {count} cells");
            Ok(())
        }),
    }
}

/// A bare file name, or a path into the configured extracts directory, is
/// looked up through the configured directories and saved to overrides. Any
/// other path is read from and saved back to its own directory.
fn open_store(level: &LevelArg, settings: &Settings) -> Result<(FsLevelStore, String)> {
    let path = &level.file;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| eyre!("{} is not a level file name", path.display()))?
        .to_string();
    let store = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) if !is_extracts_dir(dir, settings) => FsLevelStore::folder(dir),
        _ => settings.store(),
    };
    Ok((store, name))
}

fn is_extracts_dir(dir: &Path, settings: &Settings) -> bool {
    let Some(extracts) = settings.extracts_dir.as_deref() else {
        return false;
    };
    match (dir.canonicalize(), extracts.canonicalize()) {
        (Ok(dir), Ok(extracts)) => dir == extracts,
        _ => dir == extracts,
    }
}

fn open(level: &LevelArg, settings: &Settings) -> Result<(FsLevelStore, EditSession)> {
    let (store, name) = open_store(level, settings)?;
    let session = EditSession::open(&store, &name, settings.vocabulary())
        .wrap_err_with(|| format!("failed to open {name}"))?;
    for warning in session.warnings() {
        eprintln!("warning: {name}: {warning}");
    }
    Ok((store, session))
}

fn save(store: &mut FsLevelStore, session: &mut EditSession) -> Result<()> {
    let target = session
        .save(store)
        .wrap_err_with(|| format!("failed to save {}", session.name()))?;
    println!(
        "saved {}",
        store_dir(store, target).join(session.name()).display()
    );
    Ok(())
}

fn store_dir(store: &FsLevelStore, origin: LevelOrigin) -> &Path {
    match origin {
        LevelOrigin::Overrides => store.overrides_dir(),
        LevelOrigin::Extracts => store.extracts_dir().unwrap_or(Path::new(".")),
    }
}

fn edit(
    level: &LevelArg,
    settings: &Settings,
    change: impl FnOnce(&mut EditSession) -> Result<(), SessionError>,
) -> Result<()> {
    let (mut store, mut session) = open(level, settings)?;
    change(&mut session).wrap_err_with(|| format!("cannot edit {}", session.name()))?;
    save(&mut store, &mut session)
}

fn check(level: &LevelArg, settings: &Settings) -> Result<()> {
    let (_, session) = open(level, settings)?;
    let first = session.serialize();
    let again = LevelFile::parse(&first)
        .wrap_err("canonical output does not parse")?
        .value
        .serialize();
    if first != again {
        bail!("{}: canonical output is not stable", session.name());
    }
    let warnings = session.warnings().len();
    println!(
        "{}: ok, {} templates, {} rooms, {warnings} warnings",
        session.name(),
        session.level().templates.len(),
        session.level().room_count()
    );
    Ok(())
}

fn fmt(level: &LevelArg, write: bool, settings: &Settings) -> Result<()> {
    let (mut store, mut session) = open(level, settings)?;
    if write {
        return save(&mut store, &mut session);
    }
    print!("{}", session.serialize());
    Ok(())
}

#[derive(Debug, Serialize)]
struct TemplateInfo<'a> {
    name: &'a str,
    rooms: usize,
}

#[derive(Debug, Serialize)]
struct Info<'a> {
    name: &'a str,
    origin: LevelOrigin,
    biome: Biome,
    line_ending: LineEnding,
    dependencies: Vec<&'static str>,
    level_settings: usize,
    own_tile_codes: usize,
    inherited_tile_codes: usize,
    free_symbols: usize,
    level_chances: usize,
    monster_chances: usize,
    templates: Vec<TemplateInfo<'a>>,
    warnings: Vec<String>,
}

impl<'a> Info<'a> {
    fn new(session: &'a EditSession) -> Self {
        let level = session.level();
        Self {
            name: session.name(),
            origin: session.origin(),
            biome: session.biome(),
            line_ending: level.line_ending,
            dependencies: session.dependencies(),
            level_settings: level.level_settings.len(),
            own_tile_codes: level.tile_codes.own().count(),
            inherited_tile_codes: level.tile_codes.inherited().count(),
            free_symbols: session.allocator().free_count(),
            level_chances: level.level_chances.len(),
            monster_chances: level.monster_chances.len(),
            templates: level
                .templates
                .iter()
                .map(|t| TemplateInfo {
                    name: &t.name,
                    rooms: t.chunks.len(),
                })
                .collect(),
            warnings: session.warnings().iter().map(ToString::to_string).collect(),
        }
    }
}

fn info(level: &LevelArg, json: bool, settings: &Settings) -> Result<()> {
    let (_, session) = open(level, settings)?;
    let info = Info::new(&session);
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    println!("{} ({}, biome {})", info.name, info.origin, info.biome);
    println!("depends on: {}", info.dependencies.join(", "));
    println!("{:<18}{}", Section::LevelSettings.to_string(), info.level_settings);
    println!(
        "{:<18}{} own, {} inherited, {} symbols free",
        Section::TileCodes.to_string(),
        info.own_tile_codes,
        info.inherited_tile_codes,
        info.free_symbols
    );
    println!("{:<18}{}", Section::LevelChances.to_string(), info.level_chances);
    println!("{:<18}{}", Section::MonsterChances.to_string(), info.monster_chances);
    println!("{:<18}{}", Section::RoomTemplates.to_string(), info.templates.len());
    for t in &info.templates {
        println!("  {:<24}{} rooms", t.name, t.rooms);
    }
    Ok(())
}

fn tiles(level: &LevelArg, settings: &Settings) -> Result<()> {
    let (_, session) = open(level, settings)?;
    let table = &session.level().tile_codes;
    for entry in table.entries() {
        let source = match &entry.origin {
            TileCodeOrigin::Own => String::new(),
            TileCodeOrigin::Inherited(file) => format!("  (from {file})"),
            TileCodeOrigin::Implied => "  (built in)".to_string(),
        };
        println!("{}  {}{source}", entry.code.symbol, entry.code.tile_name);
    }
    let free: String = session
        .allocator()
        .free_symbols()
        .map(|s| s.as_char())
        .collect();
    println!("{} free: {free}", session.allocator().free_count());
    Ok(())
}

fn add_tile(args: &AddTileArgs, settings: &Settings) -> Result<()> {
    let blend = match args.percent {
        Some(percent) => BlendedTileCode::new(
            args.tile.as_str(),
            percent,
            args.alt.as_deref().unwrap_or(EMPTY_TILE),
        ),
        None => BlendedTileCode::solid(args.tile.as_str()),
    };
    let comment = args
        .comment
        .as_deref()
        .map(|c| format!(" {c}"))
        .unwrap_or_default();
    edit(&args.level, settings, |session| {
        let code = session.add_tile_code(&blend, &comment)?;
        println!("added {} as {}", code.symbol, code.tile_name);
        Ok(())
    })
}
