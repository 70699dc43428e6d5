use serde::Serialize;

/// Characters stripped from values for display. Never stripped on save.
const DECORATION: [char; 6] = ['[', ']', '(', ')', '"', '\''];

/// One line of a level setting or spawn chance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValueEntry {
    pub name: String,
    /// Free-form value text, kept exactly as read.
    pub value: String,
    /// Raw text after the `//` marker, empty when there is none.
    pub comment: String,
}

impl KeyValueEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Placeholder entry for a freshly added rule.
    pub fn placeholder() -> Self {
        Self::new("COMMENT", "VAL").with_comment(" COMMENT")
    }

    /// The value with bracket and quote decoration removed.
    pub fn display_value(&self) -> String {
        self.value.chars().filter(|c| !DECORATION.contains(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strips_decoration() {
        let e = KeyValueEntry::new("size", "[4, 4]");
        assert_eq!(e.display_value(), "4, 4");
        let e = KeyValueEntry::new("name", "\"(abc)\"");
        assert_eq!(e.display_value(), "abc");
    }

    #[test]
    fn value_is_untouched() {
        let e = KeyValueEntry::new("size", "[4, 4]");
        assert_eq!(e.value, "[4, 4]");
    }

    #[test]
    fn placeholder() {
        let e = KeyValueEntry::placeholder();
        assert_eq!(e.name, "COMMENT");
        assert_eq!(e.value, "VAL");
        assert_eq!(e.comment.trim(), "COMMENT");
    }
}
