use std::cmp::{max, min};
use std::fmt;

/// Position in a document.
///
/// Lines are 1-based, columns are 0-based and count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Offset in the line in characters (0-based)
    pub column: usize,
}

impl Position {
    /// Position at the very start of a document
    pub fn start() -> Self {
        Self { line: 1, column: 0 }
    }

    /// Create position at specified line and column
    pub fn at(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Half-open text range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    /// Create a range, ordering the two ends.
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            start: min(a, b),
            end: max(a, b),
        }
    }

    /// Empty range at a single position (pure insertion point).
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if position lies inside `[start, end)`
    pub fn contains(&self, pos: &Position) -> bool {
        pos >= &self.start && pos < &self.end
    }
}

/// Text selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Start point of selection (anchor) - doesn't move
    pub anchor: Position,
    /// Active point (moves with cursor)
    pub active: Position,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Start of selection (minimum position)
    pub fn start(&self) -> Position {
        min(self.anchor, self.active)
    }

    /// End of selection (maximum position)
    pub fn end(&self) -> Position {
        max(self.anchor, self.active)
    }

    /// Selection is empty (start == end)
    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    /// Selected range with ordered ends
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.active)
    }
}
