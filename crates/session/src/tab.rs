use std::fmt;
use std::path::{Path, PathBuf};

use tabpad_buffer::{Position, SearchMatch, TextBuffer, TextRange};
use tabpad_viewport::{LineNumberGutter, ScrollRequest, Viewport};

use crate::error::GoToLineError;
use crate::io::{LoadedText, TextEncoding};

/// Display name of a tab without a file
pub const UNTITLED: &str = "Untitled";

/// Opaque handle of a tab, unique for the lifetime of a session manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Settings every new tab starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDefaults {
    pub show_line_numbers: bool,
    pub word_wrap: bool,
    /// Undo steps kept per tab
    pub history_size: usize,
    /// Lines scrolled per wheel notch
    pub wheel_scroll_lines: usize,
    /// Initial size of the text view (columns, lines)
    pub view_size: (usize, usize),
}

impl Default for TabDefaults {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            word_wrap: false,
            history_size: 1000,
            wheel_scroll_lines: 1,
            view_size: (80, 24),
        }
    }
}

/// One open document.
///
/// The dirty flag is true exactly when the buffer changed since the last
/// load or successful save. All buffer access that may mutate goes through
/// [`TabSession::edit`], which folds the buffer's modification signal
/// into the flag.
#[derive(Debug, Clone)]
pub struct TabSession {
    id: TabId,
    buffer: TextBuffer,
    file_path: Option<PathBuf>,
    dirty: bool,
    show_line_numbers: bool,
    word_wrap: bool,
    encoding: TextEncoding,
    viewport: Viewport,
}

impl TabSession {
    pub fn new(id: TabId, defaults: &TabDefaults) -> Self {
        let (width, height) = defaults.view_size;
        Self {
            id,
            buffer: TextBuffer::with_history_capacity(defaults.history_size),
            file_path: None,
            dirty: false,
            show_line_numbers: defaults.show_line_numbers,
            word_wrap: defaults.word_wrap,
            encoding: TextEncoding::default(),
            viewport: Viewport::new(width, height).with_wheel_lines(defaults.wheel_scroll_lines),
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// No file, no changes, no text: an open can load into this tab
    pub fn is_pristine(&self) -> bool {
        self.file_path.is_none() && !self.dirty && self.buffer.is_empty()
    }

    /// File name, or "Untitled"
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Tab title: the display name, with " *" when there are unsaved changes
    pub fn title(&self) -> String {
        if self.dirty {
            format!("{} *", self.display_name())
        } else {
            self.display_name()
        }
    }

    /// Status line: full path (or "Untitled"), dirty marker, cursor position
    pub fn status_text(&self) -> String {
        let name = self
            .file_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| UNTITLED.to_string());
        let dirty = if self.dirty { " *" } else { "" };
        let cursor = self.buffer.cursor();
        format!(
            "{}{} | Ln {}, Col {}",
            name,
            dirty,
            cursor.line,
            cursor.column + 1
        )
    }

    /// Run an operation on the buffer and absorb its modification signal.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut TextBuffer) -> R) -> R {
        let result = f(&mut self.buffer);
        if self.buffer.take_modified() {
            self.dirty = true;
            self.viewport.clamp_to(self.buffer.line_count());
        }
        result
    }

    /// Replace `[start, end)` with `text`; returns the new cursor
    pub fn replace_range(&mut self, range: TextRange, text: &str) -> Position {
        self.edit(|buffer| buffer.replace_range(range, text))
    }

    /// Type or paste at the cursor, replacing the selection
    pub fn insert_text(&mut self, text: &str) -> Position {
        let cursor = self.edit(|buffer| buffer.insert_at_cursor(text));
        self.reveal_cursor();
        cursor
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.edit(|buffer| buffer.undo());
        self.reveal_cursor();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.edit(|buffer| buffer.redo());
        self.reveal_cursor();
        redone
    }

    /// Replace the content with a freshly read file
    pub(crate) fn load(&mut self, loaded: LoadedText, path: PathBuf) {
        self.buffer.load_text(&loaded.text);
        self.encoding = loaded.encoding;
        self.file_path = Some(path);
        self.dirty = false;
        self.viewport.scroll(ScrollRequest::ToOffset(0), self.buffer.line_count());
    }

    /// Record a successful write to `path`
    pub(crate) fn mark_saved(&mut self, path: PathBuf) {
        self.file_path = Some(path);
        self.dirty = false;
    }

    /// Text as it goes to disk
    pub fn text_for_save(&self) -> String {
        self.buffer.text_for_save()
    }

    /// Move the cursor to the start of a 1-based line, clamped to
    /// `[1, line_count]`, and scroll it into view.
    pub fn go_to_line(&mut self, line: usize) -> Position {
        let line = line.clamp(1, self.buffer.line_count());
        let pos = self.buffer.set_cursor(Position::at(line, 0));
        self.reveal_cursor();
        pos
    }

    /// Go to a line typed by the user. Anything but digits is rejected;
    /// numbers outside the document are clamped.
    pub fn go_to_line_input(&mut self, input: &str) -> Result<Position, GoToLineError> {
        let value = input.trim();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(GoToLineError::NotANumber(input.to_string()));
        }
        // All digits: only overflow can fail, which clamps to the last line
        let line = value.parse::<usize>().unwrap_or(usize::MAX);
        Ok(self.go_to_line(line))
    }

    /// Find the next match and scroll it into view
    pub fn find_next(&mut self, query: &str) -> Option<SearchMatch> {
        let found = self.edit(|buffer| tabpad_text_search::find_next(buffer, query));
        if found.is_some() {
            self.reveal_cursor();
        }
        found
    }

    /// Find the previous match and scroll it into view
    pub fn find_previous(&mut self, query: &str) -> Option<SearchMatch> {
        let found = self.edit(|buffer| tabpad_text_search::find_previous(buffer, query));
        if found.is_some() {
            self.reveal_cursor();
        }
        found
    }

    pub fn replace_one(&mut self, query: &str, replacement: &str) -> bool {
        let replaced = self.edit(|buffer| tabpad_text_search::replace_one(buffer, query, replacement));
        self.reveal_cursor();
        replaced
    }

    pub fn replace_all(&mut self, query: &str, replacement: &str) -> usize {
        self.edit(|buffer| tabpad_text_search::replace_all(buffer, query, replacement))
    }

    pub fn show_line_numbers(&self) -> bool {
        self.show_line_numbers
    }

    /// Returns the new setting
    pub fn toggle_line_numbers(&mut self) -> bool {
        self.show_line_numbers = !self.show_line_numbers;
        self.show_line_numbers
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    /// Returns the new setting
    pub fn toggle_word_wrap(&mut self) -> bool {
        self.word_wrap = !self.word_wrap;
        self.word_wrap
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Apply a scroll from the text view, the gutter or the wheel
    pub fn scroll(&mut self, request: ScrollRequest) -> bool {
        self.viewport.scroll(request, self.buffer.line_count())
    }

    pub fn resize_view(&mut self, width: usize, height: usize) -> bool {
        self.viewport
            .resize(width, height, self.buffer.line_count())
    }

    /// Line numbers for the current state, `None` while they are hidden
    pub fn gutter(&self) -> Option<LineNumberGutter> {
        self.show_line_numbers
            .then(|| LineNumberGutter::derive(self.buffer.line_count(), &self.viewport))
    }

    fn reveal_cursor(&mut self) {
        let line = self.buffer.cursor().line;
        self.viewport
            .ensure_line_visible(line, self.buffer.line_count());
    }
}
