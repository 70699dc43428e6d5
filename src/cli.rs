use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Styles};
use clap::{ArgAction, Args, Parser, Subcommand};
use lvlforge_types::Symbol;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::Yellow.on_default().bold())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "lvlforge", version, about, long_about = None, styles = STYLES)]
pub struct Cli {
    /// Settings file (default: ./lvlforge.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// A level given by name (looked up in overrides, then extracts) or by path.
/// A path outside the extracts directory is read and saved in place.
#[derive(Args, Debug)]
pub struct LevelArg {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a level, report warnings and check that rewriting it is stable
    Check(LevelArg),

    /// Print the canonical form of a level
    Fmt {
        #[command(flatten)]
        level: LevelArg,

        /// Save the canonical form instead of printing it
        #[arg(short, long)]
        write: bool,
    },

    /// Summarise sections, rooms, biome and dependencies
    Info {
        #[command(flatten)]
        level: LevelArg,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// List own and inherited tile codes and the symbols still free
    Tiles(LevelArg),

    /// Define a new tile code on the lowest free symbol
    AddTile(AddTileArgs),

    /// Remove a tile code and clear its symbol from every room
    RemoveTile {
        #[command(flatten)]
        level: LevelArg,

        #[arg(value_parser = parse_symbol)]
        symbol: Symbol,
    },

    /// Substitute one symbol for another in every room
    Replace {
        #[command(flatten)]
        level: LevelArg,

        #[arg(value_parser = parse_symbol)]
        old: Symbol,

        #[arg(value_parser = parse_symbol)]
        new: Symbol,
    },
}

#[derive(Args, Debug)]
pub struct AddTileArgs {
    #[command(flatten)]
    pub level: LevelArg,

    /// Tile name, e.g. `floor`
    pub tile: String,

    /// Chance of `tile`; the rest goes to `--alt`
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percent: Option<u8>,

    /// Second tile of a blend (default: empty)
    #[arg(short, long, requires = "percent")]
    pub alt: Option<String>,

    /// Comment written after the definition
    #[arg(short = 'm', long)]
    pub comment: Option<String>,
}

fn parse_symbol(s: &str) -> Result<Symbol, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Symbol::new(c).map_err(|e| e.to_string()),
        _ => Err(format!("expected a single character, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn symbols_are_single_characters() {
        assert_eq!(parse_symbol("X"), Ok(Symbol::new('X').unwrap()));
        assert!(parse_symbol("XY").is_err());
        assert!(parse_symbol("").is_err());
        assert!(parse_symbol(" ").is_err());
    }

    #[test]
    fn add_tile_arguments() {
        let cli = Cli::parse_from([
            "lvlforge", "-vv", "add-tile", "cave.lvl", "floor", "-p", "50", "--alt", "dirt",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::AddTile(args) = cli.command else {
            panic!("expected add-tile");
        };
        assert_eq!(args.level.file, PathBuf::from("cave.lvl"));
        assert_eq!(args.percent, Some(50));
        assert_eq!(args.alt.as_deref(), Some("dirt"));
        assert!(Cli::try_parse_from(["lvlforge", "add-tile", "a.lvl", "floor", "-p", "101"]).is_err());
    }
}
