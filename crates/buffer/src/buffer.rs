use ropey::Rope;

use super::{Action, History, LineEnding, Position, Selection, TextRange};

/// Text buffer based on Rope for efficient work with large files.
///
/// Holds the text together with the cursor, the selection and the search
/// highlight. Every coordinate stored here is kept inside the document:
/// setters clamp, and edits reposition the cursor and drop decorations
/// that would otherwise point at stale text.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Rope structure for storing text (always `\n` line breaks)
    rope: Rope,
    /// Insertion point
    cursor: Position,
    /// Active selection, if any
    selection: Option<Selection>,
    /// Transient search highlight, not part of the content
    highlight: Option<TextRange>,
    /// Raised by every mutation, consumed by `take_modified`
    modified: bool,
    /// Line ending type used when the text is written out
    line_ending: LineEnding,
    /// Edit history for undo/redo
    history: History,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::with_history_capacity(1000)
    }

    /// Create an empty buffer keeping at most `capacity` undo steps
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            rope: Rope::new(),
            cursor: Position::start(),
            selection: None,
            highlight: None,
            modified: false,
            line_ending: LineEnding::LF,
            history: History::with_capacity(capacity),
        }
    }

    /// Create buffer holding `text`, unmodified
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load_text(text);
        buffer
    }

    /// Replace the whole content with freshly loaded text.
    ///
    /// This is not an edit: history is cleared, the cursor returns to the
    /// start and no modification is reported.
    pub fn load_text(&mut self, text: &str) {
        self.line_ending = LineEnding::detect(text);
        self.rope = match self.line_ending {
            LineEnding::LF => Rope::from_str(text),
            LineEnding::CRLF => Rope::from_str(&normalize_line_breaks(text)),
        };
        self.cursor = Position::start();
        self.selection = None;
        self.highlight = None;
        self.modified = false;
        self.history.clear();
    }

    /// Get line count (an empty buffer has one line)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of a 1-based line in characters, without the line break.
    /// Lines outside the document have length 0.
    pub fn line_length(&self, line: usize) -> usize {
        if line == 0 || line > self.line_count() {
            return 0;
        }
        let slice = self.rope.line(line - 1);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Get a 1-based line without its line break
    pub fn line(&self, line: usize) -> Option<String> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        let mut text = self.rope.line(line - 1).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Get all text with `\n` line breaks
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Get all text using the line ending the content was loaded with
    pub fn text_for_save(&self) -> String {
        match self.line_ending {
            LineEnding::LF => self.text(),
            LineEnding::CRLF => {
                let text = self.text();
                let mut out = String::with_capacity(text.len() + self.line_count());
                let mut prev = None;
                for ch in text.chars() {
                    // A typed '\r' already ends this break
                    if ch == '\n' && prev != Some('\r') {
                        out.push('\r');
                    }
                    out.push(ch);
                    prev = Some(ch);
                }
                out
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Position just past the last character
    pub fn end_position(&self) -> Position {
        let last = self.line_count();
        Position::at(last, self.line_length(last))
    }

    /// Clamp a position into the document bounds
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.line_count());
        let column = pos.column.min(self.line_length(line));
        Position::at(line, column)
    }

    /// Clamp both ends of a range, keeping them ordered
    pub fn clamp_range(&self, range: TextRange) -> TextRange {
        TextRange::new(self.clamp(range.start), self.clamp(range.end))
    }

    /// Convert a position to a character index in the rope (clamped)
    pub(crate) fn pos_to_char(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.rope.line_to_char(pos.line - 1) + pos.column
    }

    /// Convert a character index in the rope to a position (clamped)
    pub(crate) fn char_to_pos(&self, char_idx: usize) -> Position {
        let char_idx = char_idx.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line_idx);
        Position::at(line_idx + 1, column)
    }

    pub(crate) fn rope_char_to_byte(&self, char_idx: usize) -> usize {
        self.rope.char_to_byte(char_idx.min(self.rope.len_chars()))
    }

    pub(crate) fn rope_byte_to_char(&self, byte_idx: usize) -> usize {
        self.rope.byte_to_char(byte_idx.min(self.rope.len_bytes()))
    }

    /// Get text in `[start, end)`
    pub fn get_text(&self, range: TextRange) -> String {
        let range = self.clamp_range(range);
        let start = self.pos_to_char(range.start);
        let end = self.pos_to_char(range.end);
        self.rope.slice(start..end).to_string()
    }

    /// Replace text in `[start, end)` with `text`.
    ///
    /// An empty range is a pure insertion. The cursor ends up after the
    /// inserted text, which is returned as the new cursor position.
    pub fn replace_range(&mut self, range: TextRange, text: &str) -> Position {
        let range = self.clamp_range(range);
        let text = normalize_line_breaks(text);
        let start_idx = self.pos_to_char(range.start);
        let end_idx = self.pos_to_char(range.end);

        if start_idx == end_idx && text.is_empty() {
            self.cursor = range.start;
            return self.cursor;
        }

        self.history.begin_group();
        if start_idx < end_idx {
            let removed = self.rope.slice(start_idx..end_idx).to_string();
            self.rope.remove(start_idx..end_idx);
            self.history.push(Action::Delete {
                position: range.start,
                text: removed,
            });
        }
        if !text.is_empty() {
            self.rope.insert(start_idx, &text);
            self.history.push(Action::Insert {
                position: range.start,
                text: text.clone(),
            });
        }
        self.history.end_group();

        self.cursor = self.char_to_pos(start_idx + text.chars().count());
        self.after_edit();
        self.cursor
    }

    /// Insert text at the cursor, replacing the selection if there is one
    pub fn insert_at_cursor(&mut self, text: &str) -> Position {
        let range = self
            .selection
            .map(|sel| sel.range())
            .unwrap_or_else(|| TextRange::empty(self.cursor));
        self.replace_range(range, text)
    }

    /// Run several edits as a single undo step
    pub fn edit_group<R>(&mut self, edit: impl FnOnce(&mut Self) -> R) -> R {
        self.history.begin_group();
        let result = edit(self);
        self.history.end_group();
        result
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor, clamped to the document. Clears the selection.
    pub fn set_cursor(&mut self, pos: Position) -> Position {
        self.cursor = self.clamp(pos);
        self.selection = None;
        self.cursor
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Set or clear the selection; the cursor follows its active end
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.map(|sel| {
            Selection::new(self.clamp(sel.anchor), self.clamp(sel.active))
        });
        if let Some(sel) = self.selection {
            self.cursor = sel.active;
        }
    }

    /// Select the whole document
    pub fn select_all(&mut self) {
        self.set_selection(Some(Selection::new(Position::start(), self.end_position())));
    }

    /// Text covered by a non-empty selection
    pub fn selected_text(&self) -> Option<String> {
        self.selection
            .filter(|sel| !sel.is_empty())
            .map(|sel| self.get_text(sel.range()))
    }

    pub fn highlight(&self) -> Option<TextRange> {
        self.highlight
    }

    pub fn set_highlight(&mut self, range: TextRange) {
        self.highlight = Some(self.clamp_range(range));
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Report a mutation once: returns true if the buffer changed since
    /// the previous call, and lowers the flag.
    pub fn take_modified(&mut self) -> bool {
        std::mem::take(&mut self.modified)
    }

    /// Undo last edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(action) => {
                self.cursor = self.apply_action(&action);
                self.after_edit();
                true
            }
            None => false,
        }
    }

    /// Redo undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(action) => {
                self.cursor = self.apply_action(&action);
                self.after_edit();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Apply action to the rope without recording it (for undo/redo)
    fn apply_action(&mut self, action: &Action) -> Position {
        match action {
            Action::Insert { position, text } => {
                let char_idx = self.pos_to_char(*position);
                self.rope.insert(char_idx, text);
                self.char_to_pos(char_idx + text.chars().count())
            }
            Action::Delete { position, text } => {
                let char_idx = self.pos_to_char(*position);
                let end_idx = (char_idx + text.chars().count()).min(self.rope.len_chars());
                self.rope.remove(char_idx..end_idx);
                self.char_to_pos(char_idx)
            }
            Action::Group { actions } => {
                let mut cursor = self.cursor;
                for action in actions {
                    cursor = self.apply_action(action);
                }
                cursor
            }
        }
    }

    fn after_edit(&mut self) {
        self.cursor = self.clamp(self.cursor);
        self.selection = None;
        self.highlight = None;
        self.modified = true;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
}
