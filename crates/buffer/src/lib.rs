//! Text buffer with rope data structure for tabpad.
//!
//! Provides text storage and manipulation using ropey, along with the
//! cursor, selection, search highlight, undo/redo history and literal
//! substring search. Lines are addressed 1-based, columns 0-based in
//! characters.

mod buffer;
mod history;
mod position;
mod search;

pub use buffer::TextBuffer;
pub use history::{Action, History};
pub use position::{Position, Selection, TextRange};
pub use search::{SearchDirection, SearchMatch};

/// Line ending type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum LineEnding {
    #[default]
    LF, // Unix \n
    CRLF, // Windows \r\n
}

impl LineEnding {
    /// Line ending a piece of text was written with.
    ///
    /// Text is CRLF only when every line break is `\r\n`; mixed text is
    /// treated as LF and keeps its carriage returns as ordinary characters.
    pub fn detect(text: &str) -> Self {
        let breaks = text.matches('\n').count();
        if breaks > 0 && text.matches("\r\n").count() == breaks {
            LineEnding::CRLF
        } else {
            LineEnding::LF
        }
    }
}
