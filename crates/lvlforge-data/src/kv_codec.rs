//! Line codec shared by the level settings, level chances and monster chances
//! tables, plus the comment splitting used by every entry line.
//!
//! An entry line is `PREFIX name <ws> value [<ws> //comment]`. The name is
//! padded to [`NAME_COLUMN`] on output.

use lvlforge_types::{KeyValueEntry, Section};

use crate::level_file::{LevelParseError, parse_err};

/// Column at which values start in canonical output.
pub const NAME_COLUMN: usize = 24;

const COMMENT_MARKER: &str = "//";

/// Split an entry remainder into its body and raw comment text.
///
/// `//` only opens a comment at the start of the text or after whitespace, so
/// values such as `a//b` survive intact.
pub fn split_comment(text: &str) -> (&str, Option<&str>) {
    let mut prev_ws = true;
    for (i, c) in text.char_indices() {
        if prev_ws && text[i..].starts_with(COMMENT_MARKER) {
            return (&text[..i], Some(&text[i + COMMENT_MARKER.len()..]));
        }
        prev_ws = c.is_whitespace();
    }
    (text, None)
}

/// Pad `head` to the value column, always leaving at least one space.
pub(crate) fn pad_to_column(head: &mut String) {
    let width = head.chars().count();
    let pad = NAME_COLUMN.saturating_sub(width).max(1);
    head.extend(std::iter::repeat_n(' ', pad));
}

pub(crate) fn push_comment(line: &mut String, comment: &str) {
    if !comment.is_empty() {
        line.push(' ');
        line.push_str(COMMENT_MARKER);
        line.push_str(comment);
    }
}

/// Parse one entry line of a flat section. `line_num` is 1-based.
pub fn parse_entry(
    section: Section,
    line_num: usize,
    line: &str,
) -> Result<KeyValueEntry, LevelParseError> {
    let rest = line
        .strip_prefix(section.prefix())
        .ok_or_else(|| parse_err(line_num, section, format!("expected {}", section.prefix())))?;
    let (body, comment) = split_comment(rest);
    let body = body.trim();
    let (name, value) = match body.split_once(char::is_whitespace) {
        Some((name, value)) => (name, value.trim()),
        None => (body, ""),
    };
    if name.is_empty() {
        return Err(parse_err(line_num, section, "entry has no name"));
    }
    Ok(KeyValueEntry::new(name, value).with_comment(comment.unwrap_or_default()))
}

/// Render one entry line without a line terminator.
pub fn format_entry(section: Section, entry: &KeyValueEntry) -> String {
    let mut line = format!("{}{}", section.prefix(), entry.name);
    if !entry.value.is_empty() {
        pad_to_column(&mut line);
        line.push_str(&entry.value);
    }
    push_comment(&mut line, &entry.comment);
    line
}

/// Parse a standalone table: one entry per non-blank line. Comment-only lines
/// are skipped.
pub fn parse_table(section: Section, text: &str) -> Result<Vec<KeyValueEntry>, LevelParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty() && !l.starts_with(COMMENT_MARKER))
        .map(|(i, l)| parse_entry(section, i + 1, l))
        .collect()
}

/// Render a table in list order, one line per entry.
pub fn format_table(section: Section, entries: &[KeyValueEntry]) -> String {
    entries
        .iter()
        .map(|e| format_entry(section, e) + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_marker_rules() {
        assert_eq!(split_comment("4 4 // size"), ("4 4 ", Some(" size")));
        assert_eq!(split_comment("//x"), ("", Some("x")));
        assert_eq!(split_comment("http://x"), ("http://x", None));
        assert_eq!(split_comment("a\t//b"), ("a\t", Some("b")));
        assert_eq!(split_comment("plain"), ("plain", None));
    }

    #[test]
    fn entry_with_list_value_and_comment() {
        let e = parse_entry(
            Section::LevelSettings,
            3,
            "\\-size                   [4, 4] // width, height",
        )
        .unwrap();
        assert_eq!(e.name, "size");
        assert_eq!(e.value, "[4, 4]");
        assert_eq!(e.comment, " width, height");
    }

    #[test]
    fn entry_without_value() {
        let e = parse_entry(Section::MonsterChances, 1, "\\+olmite").unwrap();
        assert_eq!(e.name, "olmite");
        assert_eq!(e.value, "");
        assert_eq!(format_entry(Section::MonsterChances, &e), "\\+olmite");
    }

    #[test]
    fn entry_without_name_is_an_error() {
        let err = parse_entry(Section::LevelChances, 7, "\\%   // nothing").unwrap_err();
        assert!(matches!(
            err,
            LevelParseError::Parse {
                line: 7,
                section: Section::LevelChances,
                ..
            }
        ));
    }

    #[test]
    fn format_pads_name() {
        let e = KeyValueEntry::new("back_room_chance", "0");
        let line = format_entry(Section::LevelSettings, &e);
        assert_eq!(line, "\\-back_room_chance      0");
        assert_eq!(line.find('0'), Some(NAME_COLUMN));
    }

    #[test]
    fn format_long_name_keeps_one_space() {
        let e = KeyValueEntry::new("a_really_long_setting_name", "1").with_comment(" note");
        assert_eq!(
            format_entry(Section::LevelChances, &e),
            "\\%a_really_long_setting_name 1 // note"
        );
    }

    #[test]
    fn canonical_line_round_trips() {
        let line = "\\%arrowtrap_chance      2, 2, 3, 3 // early";
        let e = parse_entry(Section::LevelChances, 1, line).unwrap();
        assert_eq!(format_entry(Section::LevelChances, &e), line);
    }

    #[test]
    fn table_keeps_order_and_duplicates() {
        let text = "\\+snake 5\n// stray\n\n\\+bat 3\n\\+snake 1\n";
        let entries = parse_table(Section::MonsterChances, text).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["snake", "bat", "snake"]);
        let out = format_table(Section::MonsterChances, &entries);
        assert_eq!(out.lines().count(), 3);
        assert!(out.starts_with("\\+snake                 5\n"));
    }
}
