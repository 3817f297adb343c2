//! Collaborators that ask the user: unsaved-changes confirmation and path
//! selection.

use std::path::PathBuf;

/// Answer to an unsaved-changes question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Save the tab, then go on
    Save,
    /// Drop the changes and go on
    Discard,
    /// Stop the whole operation
    Cancel,
}

/// Why a dirty tab is being asked about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseIntent {
    CloseTab,
    CloseAll,
    Quit,
}

impl CloseIntent {
    /// Question shown to the user after the file name
    pub fn description(self) -> &'static str {
        match self {
            CloseIntent::CloseTab | CloseIntent::CloseAll => "Save before closing",
            CloseIntent::Quit => "Save before quitting",
        }
    }
}

/// Asks whether to save a tab with unsaved changes
pub trait ConfirmationPrompt {
    fn ask(&mut self, file_name: &str, intent: &str) -> Decision;
}

impl<F> ConfirmationPrompt for F
where
    F: FnMut(&str, &str) -> Decision,
{
    fn ask(&mut self, file_name: &str, intent: &str) -> Decision {
        self(file_name, intent)
    }
}

/// Chooses paths to open or save. `None` means the user backed out.
pub trait PathPicker {
    fn choose_open_path(&mut self) -> Option<PathBuf>;

    /// `default_ext` is the extension (without dot) suggested for new files
    fn choose_save_path(&mut self, default_ext: &str) -> Option<PathBuf>;
}

/// Picker that never chooses anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPathPicker;

impl PathPicker for NoPathPicker {
    fn choose_open_path(&mut self) -> Option<PathBuf> {
        None
    }

    fn choose_save_path(&mut self, _default_ext: &str) -> Option<PathBuf> {
        None
    }
}
