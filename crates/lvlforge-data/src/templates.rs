//! Template headers and the whole-document symbol scans.

use lvlforge_types::{ChunkError, LevelTemplate, Section, Symbol};

use crate::kv_codec::{push_comment, split_comment};
use crate::level_file::{LevelParseError, parse_err};

/// Parse a `\.name [//comment]` header line.
pub fn parse_header(line_num: usize, line: &str) -> Result<LevelTemplate, LevelParseError> {
    let section = Section::RoomTemplates;
    let rest = line
        .strip_prefix(section.prefix())
        .ok_or_else(|| parse_err(line_num, section, "expected \\."))?;
    let (name, comment) = split_comment(rest);
    let name = name.trim();
    if name.is_empty() {
        return Err(parse_err(line_num, section, "template has no name"));
    }
    if name.contains(char::is_whitespace) {
        return Err(parse_err(
            line_num,
            section,
            format!("template name {name:?} contains whitespace"),
        ));
    }
    Ok(LevelTemplate::new(name).with_comment(comment.unwrap_or_default()))
}

pub fn format_header(template: &LevelTemplate) -> String {
    let mut line = format!("{}{}", Section::RoomTemplates.prefix(), template.name);
    push_comment(&mut line, &template.comment);
    line
}

/// Substitute `old` with `new` in both layers of every room of every template.
/// Returns the number of cells changed. Every room is checked before any is
/// touched, so a refusal leaves all of them as they were.
pub fn replace_symbol_everywhere(
    templates: &mut [LevelTemplate],
    old: Symbol,
    new: Symbol,
) -> Result<usize, ChunkError> {
    for chunk in templates.iter().flat_map(|t| &t.chunks) {
        chunk.check_replace(old, new)?;
    }
    let mut rooms = 0;
    let count = templates
        .iter_mut()
        .flat_map(|t| t.chunks.iter_mut())
        .inspect(|_| rooms += 1)
        .map(|c| c.replace_symbol(old, new))
        .sum::<Result<usize, _>>()?;
    log::debug!("replaced {old} with {new} in {count} cells across {rooms} rooms");
    Ok(count)
}

/// Replace every occurrence of `symbol` with air. Returns the number of cells
/// cleared.
pub fn delete_symbol_everywhere(templates: &mut [LevelTemplate], symbol: Symbol) -> usize {
    let count = templates
        .iter_mut()
        .flat_map(|t| t.chunks.iter_mut())
        .map(|c| c.clear_symbol(symbol))
        .sum();
    log::debug!("cleared {count} cells of {symbol}");
    count
}

/// Number of cells holding `symbol` across all templates.
pub fn count_symbol(templates: &[LevelTemplate], symbol: Symbol) -> usize {
    templates
        .iter()
        .flat_map(|t| &t.chunks)
        .flat_map(|c| c.grids())
        .map(|g| g.count(symbol))
        .sum()
}
