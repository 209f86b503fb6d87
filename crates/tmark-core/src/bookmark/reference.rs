use std::fmt;

/// How a user refers to a bookmark on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkRef {
    /// 1-based position in the list
    Slot(usize),
    /// Matched against the id first, then the label
    Key(String),
}

impl BookmarkRef {
    /// All-digit input is a slot; anything else is a key.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(slot) = trimmed.parse() {
                return BookmarkRef::Slot(slot);
            }
        }
        BookmarkRef::Key(trimmed.to_string())
    }
}

impl fmt::Display for BookmarkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkRef::Slot(slot) => write!(f, "slot {}", slot),
            BookmarkRef::Key(key) => write!(f, "'{}'", key),
        }
    }
}
