//! Commands the front end sends to the application.

use std::path::PathBuf;

use tabpad_buffer::{Position, Selection};
use tabpad_session::TabId;
use tabpad_viewport::ScrollRequest;

/// Everything a menu item, key binding or console line can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // === File ===
    NewTab,
    /// Open a file; `None` asks the path picker
    Open(Option<PathBuf>),
    Save,
    SaveAs,
    SaveAll,
    CloseTab,
    CloseAll,
    Quit,

    // === Edit ===
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    /// Type text at the cursor, replacing the selection
    InsertText(String),
    MoveCursor(Position),
    Select(Selection),

    // === Search ===
    /// Raw user input, validated by the active tab
    GoToLine(String),
    Find(String),
    FindPrevious(String),
    Replace {
        query: String,
        replacement: String,
    },
    ReplaceAll {
        query: String,
        replacement: String,
    },

    // === View ===
    ToggleLineNumbers,
    ToggleWordWrap,
    Scroll(ScrollRequest),
    Resize {
        width: usize,
        height: usize,
    },

    // === Tabs ===
    SelectTab(TabId),
    NextTab,
    PrevTab,

    // === Help ===
    About,
}

/// What a dispatched command produced, for the front end to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Nothing to report
    None,
    Info(String),
    /// Rejected input or a no-op the user should know about
    Warning(String),
    /// An operation failed and was rolled back
    Error(String),
    /// The session is over; the front end should exit
    Quit,
}

impl CommandResult {
    pub fn message(&self) -> Option<&str> {
        match self {
            CommandResult::Info(msg) | CommandResult::Warning(msg) | CommandResult::Error(msg) => {
                Some(msg)
            }
            CommandResult::None | CommandResult::Quit => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CommandResult::Error(_))
    }
}
