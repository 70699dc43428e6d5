//! Room grid codec: the lines of one chunk to and from a [`Chunk`].
//!
//! A chunk is an optional leading `//` comment, any number of `\!tag` lines in
//! any position, and row lines. Each row is split at its first space: the
//! characters before it are foreground columns and the non-space characters
//! after it are background columns of the same row.

use lvlforge_types::room_tag::TAG_PREFIX;
use lvlforge_types::{Chunk, Grid, RoomTag, Section, Symbol};

use crate::level_file::{LevelParseError, LevelWarning, parse_err};

const COMMENT_PREFIX: &str = "//";

/// Where a chunk sits, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct RoomContext<'a> {
    pub template: &'a str,
    pub room: usize,
}

struct SplitRow {
    line: usize,
    foreground: Vec<Symbol>,
    background: Vec<Symbol>,
}

fn parse_symbols(
    line_num: usize,
    chars: impl Iterator<Item = char>,
) -> Result<Vec<Symbol>, LevelParseError> {
    chars
        .map(|c| {
            Symbol::new(c).map_err(|e| parse_err(line_num, Section::RoomTemplates, e.to_string()))
        })
        .collect()
}

fn split_row(line_num: usize, line: &str) -> Result<SplitRow, LevelParseError> {
    let (fg, bg) = line.split_once(' ').unwrap_or((line, ""));
    Ok(SplitRow {
        line: line_num,
        foreground: parse_symbols(line_num, fg.chars())?,
        background: parse_symbols(line_num, bg.chars().filter(|c| *c != ' '))?,
    })
}

/// Decode one chunk from its `(line number, text)` lines.
///
/// Width problems do not fail the parse: the chunk is kept as read and a
/// warning is returned with it.
pub fn parse_chunk(
    lines: &[(usize, &str)],
    ctx: RoomContext<'_>,
) -> Result<(Chunk, Vec<LevelWarning>), LevelParseError> {
    let mut warnings = Vec::new();
    let mut comment = String::new();
    let mut tags = Vec::new();
    let mut rows = Vec::new();

    for (i, &(line_num, line)) in lines.iter().enumerate() {
        if let Some(text) = line.strip_prefix(COMMENT_PREFIX) {
            if i == 0 {
                comment = text.to_string();
            } else {
                log::debug!("line {line_num}: dropping comment inside room");
            }
            continue;
        }
        if line.starts_with(TAG_PREFIX) {
            let tag = RoomTag::from_line(line.trim_end()).ok_or_else(|| {
                parse_err(
                    line_num,
                    Section::RoomTemplates,
                    format!("unknown room tag {line:?}"),
                )
            })?;
            tags.push(tag);
            continue;
        }
        rows.push(split_row(line_num, line)?);
    }

    let dual = tags.contains(&RoomTag::Dual);
    let mut foreground = Grid::new();
    let mut background = dual.then(Grid::new);
    let mut stray_line = None;
    for row in rows {
        match &mut background {
            Some(bg) if row.background.is_empty() => {
                bg.push_row(vec![Symbol::AIR; row.foreground.len()]);
            }
            Some(bg) => bg.push_row(row.background),
            None if !row.background.is_empty() => {
                stray_line.get_or_insert(row.line);
            }
            None => {}
        }
        foreground.push_row(row.foreground);
    }
    if let Some(line) = stray_line {
        let w = LevelWarning::StrayBackground {
            template: ctx.template.to_string(),
            room: ctx.room,
            line,
        };
        log::warn!("{w}");
        warnings.push(w);
    }

    let chunk = Chunk::from_parts(comment, tags, foreground, background)
        .map_err(|e| parse_err(first_line(lines), Section::RoomTemplates, e.to_string()))?;
    if let Err(error) = chunk.validate() {
        let w = LevelWarning::MalformedRoom {
            template: ctx.template.to_string(),
            room: ctx.room,
            line: first_line(lines),
            error,
        };
        log::warn!("{w}");
        warnings.push(w);
    }
    Ok((chunk, warnings))
}

fn first_line(lines: &[(usize, &str)]) -> usize {
    lines.first().map_or(0, |(n, _)| *n)
}

/// Tag and row lines of a chunk, without its comment.
pub fn body_lines(chunk: &Chunk) -> Vec<String> {
    let mut out: Vec<String> = chunk.tags().iter().map(|t| t.line()).collect();
    let fg = chunk.foreground().row_strings();
    match chunk.background() {
        Some(bg) => {
            let bg = bg.row_strings();
            out.extend(fg.into_iter().zip(bg).map(|(f, b)| format!("{f} {b}")));
        }
        None => out.extend(fg),
    }
    out
}

/// Encode a chunk as it appears inside a template.
///
/// The comment line is written when there is a comment, and for an otherwise
/// empty room so that the room is not lost.
pub fn format_chunk(chunk: &Chunk) -> Vec<String> {
    let body = body_lines(chunk);
    let mut out = Vec::with_capacity(body.len() + 1);
    if !chunk.comment.is_empty() || body.is_empty() {
        out.push(format!("{COMMENT_PREFIX}{}", chunk.comment));
    }
    out.extend(body);
    out
}

/// Clipboard form of a room: its name on the first line, then its tag and row
/// lines.
pub fn to_clipboard(chunk: &Chunk) -> String {
    let mut text = chunk.name().to_string();
    for line in body_lines(chunk) {
        text.push('\n');
        text.push_str(&line);
    }
    text
}

/// Read a room back from its clipboard form.
pub fn from_clipboard(text: &str) -> Result<(Chunk, Vec<LevelWarning>), LevelParseError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    let name = lines
        .next()
        .map(|(_, l)| l.trim())
        .filter(|l| !l.is_empty())
        .ok_or_else(|| parse_err(1, Section::RoomTemplates, "clipboard has no room name"))?;
    let body: Vec<(usize, &str)> = lines.filter(|(_, l)| !l.trim().is_empty()).collect();
    let ctx = RoomContext {
        template: "clipboard",
        room: 0,
    };
    let (mut chunk, warnings) = parse_chunk(&body, ctx)?;
    chunk.rename(name);
    Ok((chunk, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lvlforge_types::GridError;

    const CTX: RoomContext<'static> = RoomContext {
        template: "test",
        room: 0,
    };

    fn numbered<'a>(lines: &[&'a str]) -> Vec<(usize, &'a str)> {
        lines.iter().enumerate().map(|(i, l)| (i + 1, *l)).collect()
    }

    fn parse(lines: &[&str]) -> (Chunk, Vec<LevelWarning>) {
        parse_chunk(&numbered(lines), CTX).expect("parse")
    }

    #[test]
    fn dual_row_splits_at_space() {
        let (c, w) = parse(&["//", "\\!dual", "4111 0006"]);
        assert!(w.is_empty());
        assert_eq!(c.foreground().row_strings(), vec!["4111"]);
        assert_eq!(c.background().unwrap().row_strings(), vec!["0006"]);
    }

    #[test]
    fn tags_anywhere_keep_file_order() {
        let (c, _) = parse(&["// room", "1111", "\\!ignore", "0000", "\\!flip"]);
        assert_eq!(c.tags(), &[RoomTag::Ignore, RoomTag::Flip]);
        assert_eq!(c.foreground().height(), 2);
        assert_eq!(c.comment, " room");
        assert_eq!(
            body_lines(&c),
            vec!["\\!ignore", "\\!flip", "1111", "0000"]
        );
    }

    #[test]
    fn dual_missing_background_is_air() {
        let (c, w) = parse(&["\\!dual", "44", "11 22"]);
        assert!(w.is_empty());
        assert_eq!(c.background().unwrap().row_strings(), vec!["00", "22"]);
    }

    #[test]
    fn stray_background_is_dropped_with_warning() {
        let (c, w) = parse(&["11 22", "11"]);
        assert!(!c.is_dual());
        assert_eq!(c.foreground().row_strings(), vec!["11", "11"]);
        assert!(matches!(w.as_slice(), [LevelWarning::StrayBackground { line: 1, .. }]));
    }

    #[test]
    fn ragged_room_loads_with_warning() {
        let (c, w) = parse(&["111", "11"]);
        assert_eq!(c.foreground().height(), 2);
        assert!(matches!(
            w.as_slice(),
            [LevelWarning::MalformedRoom {
                error: GridError::Ragged { row: 1, .. },
                ..
            }]
        ));
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let err = parse_chunk(&numbered(&["\\!sideways", "11"]), CTX).unwrap_err();
        assert!(matches!(
            err,
            LevelParseError::Parse {
                line: 1,
                section: Section::RoomTemplates,
                ..
            }
        ));
    }

    #[test]
    fn background_spaces_are_ignored() {
        let (c, _) = parse(&["\\!dual", "12 3 4"]);
        assert_eq!(c.background().unwrap().row_strings(), vec!["34"]);
    }

    #[test]
    fn format_includes_comment_and_tags() {
        let (c, _) = parse(&["// entrance", "\\!dual", "\\!flip", "44 00", "11 00"]);
        assert_eq!(
            format_chunk(&c),
            vec!["// entrance", "\\!dual", "\\!flip", "44 00", "11 00"]
        );
    }

    #[test]
    fn empty_room_keeps_its_marker() {
        let (c, _) = parse(&["//"]);
        assert!(c.foreground().is_empty());
        assert_eq!(format_chunk(&c), vec!["//"]);
    }

    #[test]
    fn dual_toggle_round_trip_rows() {
        let (mut c, _) = parse(&["44", "11"]);
        c.make_dual();
        assert_eq!(body_lines(&c), vec!["\\!dual", "44 00", "11 00"]);
        c.discard_background();
        assert_eq!(body_lines(&c), vec!["44", "11"]);
    }

    #[test]
    fn clipboard_round_trip() {
        let (c, _) = parse(&["// ladder room", "\\!rare", "1001", "1001"]);
        let text = to_clipboard(&c);
        assert_eq!(text, "ladder room\n\\!rare\n1001\n1001");
        let (pasted, w) = from_clipboard(&text).unwrap();
        assert!(w.is_empty());
        assert_eq!(pasted, c);
    }

    #[test]
    fn clipboard_needs_a_name() {
        assert!(from_clipboard("").is_err());
        assert!(from_clipboard("\n1111").is_err());
    }
}
