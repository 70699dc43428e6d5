//! The level file aggregate and its text form.
//!
//! A level file is a sequence of lines. Entry lines start with a section
//! prefix (`\-`, `\?`, `\%`, `\+`, `\.`); everything after a `\.` template
//! header up to the next entry line belongs to that template and is grouped
//! into rooms by blank lines. Three-line comment banners naming a section are
//! layout only: they are dropped on read and written back in front of every
//! non-empty section.

use serde::Serialize;
use strum::IntoEnumIterator;

use lvlforge_types::{ChunkError, GridError, KeyValueEntry, LevelTemplate, Section, Symbol};

use crate::kv_codec::{format_entry, parse_entry};
use crate::room_codec::{RoomContext, format_chunk, parse_chunk};
use crate::templates::{
    delete_symbol_everywhere, format_header, parse_header, replace_symbol_everywhere,
};
use crate::tile_codes::{
    TileCodeError, TileCodeTable, format_tile_code_line, parse_tile_code_line,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelParseError {
    #[error("line {line} ({section}): {msg}")]
    Parse {
        line: usize,
        section: Section,
        msg: String,
    },
}

pub(crate) fn parse_err(
    line: usize,
    section: Section,
    msg: impl Into<String>,
) -> LevelParseError {
    LevelParseError::Parse {
        line,
        section,
        msg: msg.into(),
    }
}

/// A problem that does not stop a file from loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelWarning {
    #[error("line {line}: room {room} of {template} is malformed: {error}")]
    MalformedRoom {
        template: String,
        room: usize,
        line: usize,
        error: GridError,
    },
    #[error("line {line}: room {room} of {template} has background columns but no \\!dual; dropped")]
    StrayBackground {
        template: String,
        room: usize,
        line: usize,
    },
    #[error("dependency {name} not found; its tile codes are unavailable")]
    MissingDependency { name: String },
    #[error("dependency {name} could not be read: {reason}")]
    UnreadableDependency { name: String, reason: String },
}

/// A parsed value plus the warnings raised while reading it.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value: T,
    pub warnings: Vec<LevelWarning>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// The terminator of the first line in `text`.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => Self::CrLf,
            _ => Self::Lf,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelFile {
    /// Comment lines ahead of the first section, joined with `\n`.
    pub comment: String,
    pub level_settings: Vec<KeyValueEntry>,
    pub tile_codes: TileCodeTable,
    pub level_chances: Vec<KeyValueEntry>,
    pub monster_chances: Vec<KeyValueEntry>,
    pub templates: Vec<LevelTemplate>,
    pub line_ending: LineEnding,
}

const BANNER_RULE: &str = " ------------------------------";

fn is_rule(text: &str) -> bool {
    let t = text.trim();
    !t.is_empty() && t.chars().all(|c| c == '-')
}

/// The section named by a three-line banner starting at `lines[i]`.
fn banner_at(lines: &[&str], i: usize) -> Option<Section> {
    let comment = |j: usize| lines.get(j).and_then(|l| l.strip_prefix("//"));
    match (comment(i), comment(i + 1), comment(i + 2)) {
        (Some(a), Some(title), Some(b)) if is_rule(a) && is_rule(b) => {
            Section::from_title(title.trim())
        }
        _ => None,
    }
}

#[derive(Default)]
struct Reader<'a> {
    level: LevelFile,
    warnings: Vec<LevelWarning>,
    file_comment: Vec<&'a str>,
    in_body: bool,
    section: Option<Section>,
    room: Vec<(usize, &'a str)>,
    tile_lines: Vec<(Symbol, usize)>,
}

impl<'a> Reader<'a> {
    fn finish_room(&mut self) -> Result<(), LevelParseError> {
        if self.room.is_empty() {
            return Ok(());
        }
        let lines = std::mem::take(&mut self.room);
        let Some(template) = self.level.templates.last_mut() else {
            return Ok(());
        };
        let ctx = RoomContext {
            template: &template.name,
            room: template.chunks.len(),
        };
        let (chunk, warnings) = parse_chunk(&lines, ctx)?;
        template.push_chunk(chunk);
        self.warnings.extend(warnings);
        Ok(())
    }

    fn in_template(&self) -> bool {
        self.section == Some(Section::RoomTemplates) && !self.level.templates.is_empty()
    }

    fn entry(
        &mut self,
        section: Section,
        line_num: usize,
        line: &'a str,
    ) -> Result<(), LevelParseError> {
        self.finish_room()?;
        self.in_body = true;
        self.section = Some(section);
        match section {
            Section::LevelSettings | Section::LevelChances | Section::MonsterChances => {
                let entry = parse_entry(section, line_num, line)?;
                if let Some(entries) = self.level.entries_mut(section) {
                    entries.push(entry);
                }
            }
            Section::TileCodes => {
                let code = parse_tile_code_line(line_num, line)?;
                let symbol = code.symbol;
                if let Err(TileCodeError::DuplicateSymbol(_)) =
                    self.level.tile_codes.insert_own(code)
                {
                    let first = self
                        .tile_lines
                        .iter()
                        .find(|(s, _)| *s == symbol)
                        .map_or(0, |(_, l)| *l);
                    return Err(parse_err(
                        line_num,
                        section,
                        format!("symbol {symbol} already defined on line {first}"),
                    ));
                }
                self.tile_lines.push((symbol, line_num));
            }
            Section::RoomTemplates => self.level.templates.push(parse_header(line_num, line)?),
        }
        Ok(())
    }

    fn comment(&mut self, line_num: usize, line: &'a str) {
        if !self.in_body {
            self.file_comment.push(&line[2..]);
        } else if self.in_template() {
            self.room.push((line_num, line));
        } else {
            log::debug!("line {line_num}: dropping stray comment");
        }
    }

    fn row(&mut self, line_num: usize, line: &'a str) -> Result<(), LevelParseError> {
        if !self.in_template() {
            return Err(parse_err(
                line_num,
                Section::RoomTemplates,
                format!("room line outside of a template: {line:?}"),
            ));
        }
        self.room.push((line_num, line));
        Ok(())
    }
}

impl LevelFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse level file text.
    pub fn parse(text: &str) -> Result<Parsed<LevelFile>, LevelParseError> {
        let lines: Vec<&str> = text.lines().collect();
        let mut r = Reader::default();
        r.level.line_ending = LineEnding::detect(text);

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let line_num = i + 1;
            i += 1;
            if line.trim().is_empty() {
                r.finish_room()?;
                continue;
            }
            if let Some(section) = banner_at(&lines, line_num - 1) {
                r.finish_room()?;
                r.in_body = true;
                r.section = Some(section);
                i += 2;
                continue;
            }
            if line.starts_with("//") {
                r.comment(line_num, line);
                continue;
            }
            match Section::from_line(line) {
                Some(section) => r.entry(section, line_num, line)?,
                None => r.row(line_num, line)?,
            }
        }
        r.finish_room()?;
        r.level.comment = r.file_comment.join("\n");
        Ok(Parsed {
            value: r.level,
            warnings: r.warnings,
        })
    }

    /// Render the file in canonical layout.
    pub fn serialize(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if !self.comment.is_empty() {
            lines.extend(self.comment.split('\n').map(|l| format!("//{l}")));
            lines.push(String::new());
        }
        for section in Section::iter() {
            let body = self.section_lines(section);
            if body.is_empty() {
                continue;
            }
            lines.push(format!("//{BANNER_RULE}"));
            lines.push(format!("//  {section}"));
            lines.push(format!("//{BANNER_RULE}"));
            lines.push(String::new());
            lines.extend(body);
        }
        let eol = self.line_ending.as_str();
        lines.iter().fold(String::new(), |mut out, l| {
            out.push_str(l);
            out.push_str(eol);
            out
        })
    }

    fn section_lines(&self, section: Section) -> Vec<String> {
        let flat = |entries: &[KeyValueEntry]| -> Vec<String> {
            if entries.is_empty() {
                return Vec::new();
            }
            let mut out: Vec<String> = entries.iter().map(|e| format_entry(section, e)).collect();
            out.push(String::new());
            out
        };
        match section {
            Section::LevelSettings => flat(&self.level_settings),
            Section::LevelChances => flat(&self.level_chances),
            Section::MonsterChances => flat(&self.monster_chances),
            Section::TileCodes => {
                let mut out: Vec<String> =
                    self.tile_codes.own().map(format_tile_code_line).collect();
                if !out.is_empty() {
                    out.push(String::new());
                }
                out
            }
            Section::RoomTemplates => {
                let mut out = Vec::new();
                for template in &self.templates {
                    out.push(format_header(template));
                    out.push(String::new());
                    for chunk in &template.chunks {
                        out.extend(format_chunk(chunk));
                        out.push(String::new());
                    }
                }
                out
            }
        }
    }

    pub fn entries(&self, section: Section) -> Option<&Vec<KeyValueEntry>> {
        match section {
            Section::LevelSettings => Some(&self.level_settings),
            Section::LevelChances => Some(&self.level_chances),
            Section::MonsterChances => Some(&self.monster_chances),
            Section::TileCodes | Section::RoomTemplates => None,
        }
    }

    /// The key-value list of a flat section.
    pub fn entries_mut(&mut self, section: Section) -> Option<&mut Vec<KeyValueEntry>> {
        match section {
            Section::LevelSettings => Some(&mut self.level_settings),
            Section::LevelChances => Some(&mut self.level_chances),
            Section::MonsterChances => Some(&mut self.monster_chances),
            Section::TileCodes | Section::RoomTemplates => None,
        }
    }

    pub fn template(&self, name: &str) -> Option<&LevelTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn template_mut(&mut self, name: &str) -> Option<&mut LevelTemplate> {
        self.templates.iter_mut().find(|t| t.name == name)
    }

    pub fn replace_symbol_everywhere(
        &mut self,
        old: Symbol,
        new: Symbol,
    ) -> Result<usize, ChunkError> {
        replace_symbol_everywhere(&mut self.templates, old, new)
    }

    pub fn delete_symbol_everywhere(&mut self, symbol: Symbol) -> usize {
        delete_symbol_everywhere(&mut self.templates, symbol)
    }

    pub fn room_count(&self) -> usize {
        self.templates.iter().map(|t| t.chunks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvlforge_types::RoomTag;

    const SAMPLE: &str = "\
// Dwelling rooms
// edited by hand

// ------------------------------
//  LEVEL SETTINGS
// ------------------------------

\\-size                  4 4 // width, height

// ------------------------------
//  TILE CODES
// ------------------------------

\\?floor                 1
\\?push_block            4
\\?floor%50              X // half floor

// ------------------------------
//  MONSTER CHANCES
// ------------------------------

\\+snake                 5

// ------------------------------
//  ROOM TEMPLATES
// ------------------------------

\\.setroom1-1 // top left

// ladder room
\\!dual
\\!flip
4111 0006
00X0 0000

// plain
1111
0000

\\.path_normal

//

";

    fn parse(text: &str) -> Parsed<LevelFile> {
        LevelFile::parse(text).expect("parse")
    }

    #[test]
    fn sample_round_trips() {
        let p = parse(SAMPLE);
        assert!(p.warnings.is_empty());
        assert_eq!(p.value.serialize(), SAMPLE);
    }

    #[test]
    fn sample_structure() {
        let level = parse(SAMPLE).value;
        assert_eq!(level.comment, " Dwelling rooms\n edited by hand");
        assert_eq!(level.level_settings.len(), 1);
        assert_eq!(level.tile_codes.len(), 3);
        assert!(level.level_chances.is_empty());
        assert_eq!(level.monster_chances[0].name, "snake");
        assert_eq!(level.templates.len(), 2);
        let t = &level.templates[0];
        assert_eq!(t.comment, " top left");
        assert_eq!(t.chunks.len(), 2);
        assert_eq!(t.chunks[0].tags(), &[RoomTag::Dual, RoomTag::Flip]);
        assert_eq!(t.chunks[0].background().unwrap().row_strings(), vec!["0006", "0000"]);
        assert_eq!(t.chunks[1].name(), "plain");
        let empty = &level.templates[1];
        assert_eq!(empty.chunks.len(), 1);
        assert!(empty.chunks[0].foreground().is_empty());
    }

    #[test]
    fn empty_file() {
        let p = parse("");
        assert_eq!(p.value, LevelFile::new());
        assert_eq!(p.value.serialize(), "");
    }

    #[test]
    fn crlf_is_kept() {
        let text = SAMPLE.replace('\n', "\r\n");
        let p = parse(&text);
        assert_eq!(p.value.line_ending, LineEnding::CrLf);
        assert_eq!(p.value.serialize(), text);
    }

    #[test]
    fn loose_layout_is_normalised_and_then_stable() {
        let text = "\\?floor 1\n\\-size 4 4\n\\.room\n1111\n\\!rare\n";
        let first = parse(text).value.serialize();
        assert!(first.starts_with("// ------------------------------\n//  LEVEL SETTINGS\n"));
        assert_eq!(parse(&first).value.serialize(), first);
        let level = parse(&first).value;
        assert_eq!(level.templates[0].chunks[0].tags(), &[RoomTag::Rare]);
    }

    #[test]
    fn duplicate_symbol_is_an_error() {
        let err = LevelFile::parse("\\?floor 1\n\\?door 1\n").unwrap_err();
        assert_eq!(
            err,
            LevelParseError::Parse {
                line: 2,
                section: Section::TileCodes,
                msg: "symbol 1 already defined on line 1".into()
            }
        );
    }

    #[test]
    fn row_outside_template_is_an_error() {
        let err = LevelFile::parse("\\-size 4 4\n1111\n").unwrap_err();
        assert!(matches!(
            err,
            LevelParseError::Parse {
                line: 2,
                section: Section::RoomTemplates,
                ..
            }
        ));
    }

    #[test]
    fn stray_comments_in_flat_sections_are_dropped() {
        let text = "\\-size 4 4\n// about size\n\\-other 1\n";
        let level = parse(text).value;
        assert_eq!(level.level_settings.len(), 2);
        assert!(!level.serialize().contains("about size"));
    }

    #[test]
    fn single_dash_comment_in_template_is_a_room_comment() {
        let text = "\\.room\n\n// ---\n1111\n";
        let level = parse(text).value;
        assert_eq!(level.templates[0].chunks[0].comment, " ---");
    }

    #[test]
    fn malformed_room_still_loads() {
        let text = "\\.room\n\n111\n11\n\n1111\n";
        let p = parse(text);
        assert_eq!(p.value.templates[0].chunks.len(), 2);
        assert!(matches!(
            p.warnings.as_slice(),
            [LevelWarning::MalformedRoom { room: 0, line: 3, .. }]
        ));
    }

    #[test]
    fn section_access() {
        let mut level = parse(SAMPLE).value;
        assert!(level.entries(Section::TileCodes).is_none());
        level
            .entries_mut(Section::LevelChances)
            .unwrap()
            .push(KeyValueEntry::placeholder());
        assert!(level.serialize().contains("//  LEVEL CHANCES"));
        assert_eq!(level.room_count(), 3);
        assert!(level.template("path_normal").is_some());
    }

    #[test]
    fn delete_symbol_through_aggregate() {
        let mut level = parse(SAMPLE).value;
        let x = Symbol::new('X').unwrap();
        assert_eq!(level.delete_symbol_everywhere(x), 1);
        assert!(level.serialize().contains("\n0000 0000\n"));
    }
}
