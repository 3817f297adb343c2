//! Ordered set of tabs and the operations that span them.

use std::path::{Path, PathBuf};

use crate::error::{FileIoError, SessionError};
use crate::io::FileIo;
use crate::prompt::{CloseIntent, ConfirmationPrompt, Decision, PathPicker};
use crate::tab::{TabDefaults, TabId, TabSession};

/// Extension appended to saved files chosen without one
pub const DEFAULT_EXTENSION: &str = "txt";

/// Result of a save that may ask for a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The picker returned no path; nothing was written
    Cancelled,
}

/// Result of a guarded close or quit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The user cancelled; no tab was closed
    Cancelled,
}

/// Per-tab results of [`SessionManager::save_all`]
#[derive(Debug, Default)]
pub struct SaveAllReport {
    pub saved: Vec<TabId>,
    /// Unbound tabs the picker chose no path for
    pub skipped: Vec<TabId>,
    pub failed: Vec<(TabId, FileIoError)>,
}

impl SaveAllReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Everything a guarded close needs from the outside world
pub struct Collaborators<'a> {
    pub io: &'a dyn FileIo,
    pub prompt: &'a mut dyn ConfirmationPrompt,
    pub picker: &'a mut dyn PathPicker,
}

/// Owns every open tab and tracks the active one.
///
/// At least one tab exists at all times, except after a successful
/// [`quit`](SessionManager::quit), which leaves the manager terminated
/// with no tabs.
#[derive(Debug)]
pub struct SessionManager {
    tabs: Vec<TabSession>,
    active: Option<TabId>,
    next_id: u64,
    defaults: TabDefaults,
    default_extension: String,
    terminated: bool,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(TabDefaults::default())
    }
}

impl SessionManager {
    /// Create a manager holding one empty tab
    pub fn new(defaults: TabDefaults) -> Self {
        let mut manager = Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            defaults,
            default_extension: DEFAULT_EXTENSION.to_string(),
            terminated: false,
        };
        manager.new_tab();
        manager
    }

    /// Extension (without dot) appended to save paths that have none
    pub fn with_default_extension(mut self, ext: impl Into<String>) -> Self {
        self.default_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn default_extension(&self) -> &str {
        &self.default_extension
    }

    pub fn tabs(&self) -> &[TabSession] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn tab(&self, id: TabId) -> Option<&TabSession> {
        self.tabs.iter().find(|tab| tab.id() == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut TabSession> {
        self.tabs.iter_mut().find(|tab| tab.id() == id)
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active(&self) -> Option<&TabSession> {
        self.active.and_then(|id| self.tab(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut TabSession> {
        let id = self.active?;
        self.tab_mut(id)
    }

    /// True after a successful quit
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(TabSession::is_dirty)
    }

    /// Resize every tab's view; new tabs start at this size too
    pub fn resize_views(&mut self, width: usize, height: usize) {
        self.defaults.view_size = (width, height);
        for tab in &mut self.tabs {
            tab.resize_view(width, height);
        }
    }

    /// Make `id` the active tab
    pub fn select(&mut self, id: TabId) -> Result<(), SessionError> {
        if self.tab(id).is_none() {
            return Err(SessionError::UnknownTab(id));
        }
        self.active = Some(id);
        Ok(())
    }

    /// Activate the tab after the active one, wrapping around
    pub fn select_next(&mut self) -> Option<TabId> {
        self.select_relative(1)
    }

    /// Activate the tab before the active one, wrapping around
    pub fn select_prev(&mut self) -> Option<TabId> {
        self.select_relative(self.tabs.len().saturating_sub(1))
    }

    fn select_relative(&mut self, step: usize) -> Option<TabId> {
        if self.tabs.is_empty() {
            return None;
        }
        let current = self.active_index().unwrap_or(0);
        let id = self.tabs[(current + step) % self.tabs.len()].id();
        self.active = Some(id);
        Some(id)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    fn active_index(&self) -> Option<usize> {
        self.active.and_then(|id| self.index_of(id))
    }

    /// Add an empty, unbound, clean tab and make it active
    pub fn new_tab(&mut self) -> TabId {
        let id = TabId::new(self.next_id);
        self.next_id += 1;
        self.tabs.push(TabSession::new(id, &self.defaults));
        self.active = Some(id);
        self.terminated = false;
        tabpad_logger::debug(format!("Created tab {}", id));
        id
    }

    /// Open `path` in a tab.
    ///
    /// The file is read before any state changes. The active tab is reused
    /// when it is pristine; otherwise a new tab is created.
    pub fn open_file(&mut self, path: &Path, io: &dyn FileIo) -> Result<TabId, SessionError> {
        let loaded = io.read(path).map_err(|err| {
            tabpad_logger::warn(format!("Failed to open {}: {}", path.display(), err));
            err
        })?;

        let reusable = self.active().filter(|tab| tab.is_pristine()).map(TabSession::id);
        let id = match reusable {
            Some(id) => id,
            None => self.new_tab(),
        };
        let encoding = loaded.encoding;
        let tab = self.tab_mut(id).ok_or(SessionError::UnknownTab(id))?;
        tab.load(loaded, path.to_path_buf());
        self.active = Some(id);

        tabpad_logger::info(format!("Opened {} ({})", path.display(), encoding));
        Ok(id)
    }

    /// Write a tab's full text to `path`.
    ///
    /// Success clears the dirty flag and binds the tab to `path`. Failure
    /// leaves the tab untouched and returns the I/O error.
    pub fn write_tab(&mut self, id: TabId, path: &Path, io: &dyn FileIo) -> Result<(), SessionError> {
        let tab = self.tab_mut(id).ok_or(SessionError::UnknownTab(id))?;
        if let Err(err) = io.write(path, &tab.text_for_save()) {
            tabpad_logger::warn(format!("Failed to save {}: {}", path.display(), err));
            return Err(err.into());
        }
        tab.mark_saved(path.to_path_buf());
        tabpad_logger::info(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Save a tab to its bound path, asking the picker when it has none
    pub fn save_tab(
        &mut self,
        id: TabId,
        io: &dyn FileIo,
        picker: &mut dyn PathPicker,
    ) -> Result<SaveOutcome, SessionError> {
        let tab = self.tab(id).ok_or(SessionError::UnknownTab(id))?;
        match tab.file_path().map(Path::to_path_buf) {
            Some(path) => {
                self.write_tab(id, &path, io)?;
                Ok(SaveOutcome::Saved(path))
            }
            None => self.save_tab_as(id, io, picker),
        }
    }

    /// Ask the picker for a new path and save the tab there
    pub fn save_tab_as(
        &mut self,
        id: TabId,
        io: &dyn FileIo,
        picker: &mut dyn PathPicker,
    ) -> Result<SaveOutcome, SessionError> {
        if self.tab(id).is_none() {
            return Err(SessionError::UnknownTab(id));
        }
        let Some(path) = picker.choose_save_path(&self.default_extension) else {
            return Ok(SaveOutcome::Cancelled);
        };
        let path = with_default_extension(path, &self.default_extension);
        self.write_tab(id, &path, io)?;
        Ok(SaveOutcome::Saved(path))
    }

    /// Save the active tab
    pub fn save_active(
        &mut self,
        io: &dyn FileIo,
        picker: &mut dyn PathPicker,
    ) -> Result<SaveOutcome, SessionError> {
        match self.active {
            Some(id) => self.save_tab(id, io, picker),
            None => Ok(SaveOutcome::Cancelled),
        }
    }

    /// Save the active tab under a newly chosen path
    pub fn save_as_active(
        &mut self,
        io: &dyn FileIo,
        picker: &mut dyn PathPicker,
    ) -> Result<SaveOutcome, SessionError> {
        match self.active {
            Some(id) => self.save_tab_as(id, io, picker),
            None => Ok(SaveOutcome::Cancelled),
        }
    }

    /// Save every dirty tab in order.
    ///
    /// Unbound tabs ask the picker; no path skips the tab. A failure is
    /// recorded and the remaining tabs are still saved.
    pub fn save_all(&mut self, io: &dyn FileIo, picker: &mut dyn PathPicker) -> SaveAllReport {
        let mut report = SaveAllReport::default();
        let dirty: Vec<TabId> = self
            .tabs
            .iter()
            .filter(|tab| tab.is_dirty())
            .map(TabSession::id)
            .collect();

        for id in dirty {
            match self.save_tab(id, io, picker) {
                Ok(SaveOutcome::Saved(_)) => report.saved.push(id),
                Ok(SaveOutcome::Cancelled) => report.skipped.push(id),
                Err(SessionError::Io(err)) => report.failed.push((id, err)),
                Err(SessionError::UnknownTab(_)) => {}
            }
        }
        report
    }

    /// Ask about a dirty tab. Returns true when the caller may go on.
    fn confirm_unsaved(
        &mut self,
        id: TabId,
        intent: CloseIntent,
        with: &mut Collaborators<'_>,
    ) -> Result<bool, SessionError> {
        let tab = self.tab(id).ok_or(SessionError::UnknownTab(id))?;
        if !tab.is_dirty() {
            return Ok(true);
        }

        match with.prompt.ask(&tab.display_name(), intent.description()) {
            Decision::Save => {
                let outcome = self.save_tab(id, with.io, &mut *with.picker)?;
                Ok(outcome != SaveOutcome::Cancelled)
            }
            Decision::Discard => Ok(true),
            Decision::Cancel => Ok(false),
        }
    }

    /// Close a tab, asking first when it has unsaved changes.
    ///
    /// Closing the last tab leaves one fresh empty tab.
    pub fn close_tab(
        &mut self,
        id: TabId,
        with: &mut Collaborators<'_>,
    ) -> Result<CloseOutcome, SessionError> {
        if !self.confirm_unsaved(id, CloseIntent::CloseTab, with)? {
            return Ok(CloseOutcome::Cancelled);
        }

        let index = self.index_of(id).ok_or(SessionError::UnknownTab(id))?;
        let closed = self.tabs.remove(index);
        tabpad_logger::info(format!("Closed {}", closed.display_name()));

        if self.tabs.is_empty() {
            self.new_tab();
        } else if self.active == Some(id) {
            let next = self.tabs.get(index).or_else(|| self.tabs.get(index.wrapping_sub(1)));
            self.active = next.map(TabSession::id);
        }
        Ok(CloseOutcome::Closed)
    }

    /// Close the active tab
    pub fn close_active(&mut self, with: &mut Collaborators<'_>) -> Result<CloseOutcome, SessionError> {
        match self.active {
            Some(id) => self.close_tab(id, with),
            None => Ok(CloseOutcome::Cancelled),
        }
    }

    /// Confirm every tab in order; the first cancel stops and closes nothing
    fn confirm_all(
        &mut self,
        intent: CloseIntent,
        with: &mut Collaborators<'_>,
    ) -> Result<bool, SessionError> {
        let ids: Vec<TabId> = self.tabs.iter().map(TabSession::id).collect();
        for id in ids {
            if !self.confirm_unsaved(id, intent, with)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Close every tab, all or nothing, and start over with one empty tab
    pub fn close_all(&mut self, with: &mut Collaborators<'_>) -> Result<CloseOutcome, SessionError> {
        if !self.confirm_all(CloseIntent::CloseAll, with)? {
            return Ok(CloseOutcome::Cancelled);
        }
        let count = self.tabs.len();
        self.tabs.clear();
        self.new_tab();
        tabpad_logger::info(format!("Closed {} tab(s)", count));
        Ok(CloseOutcome::Closed)
    }

    /// Guarded quit. On success every tab is torn down and the manager is
    /// terminated.
    pub fn quit(&mut self, with: &mut Collaborators<'_>) -> Result<CloseOutcome, SessionError> {
        if !self.confirm_all(CloseIntent::Quit, with)? {
            tabpad_logger::info("Quit cancelled");
            return Ok(CloseOutcome::Cancelled);
        }
        self.tabs.clear();
        self.active = None;
        self.terminated = true;
        tabpad_logger::info("Session terminated");
        Ok(CloseOutcome::Closed)
    }
}

/// Append `ext` when the chosen file name has no extension
pub fn with_default_extension(path: PathBuf, ext: &str) -> PathBuf {
    if ext.is_empty() || path.extension().is_some() {
        path
    } else {
        path.with_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tabpad_buffer::{Position, TextRange};

    use super::*;
    use crate::error::FileIoErrorKind;
    use crate::io::MemoryFileIo;
    use crate::prompt::NoPathPicker;

    /// Picker that hands out queued save paths
    #[derive(Default)]
    struct ScriptedPicker {
        save_paths: VecDeque<Option<PathBuf>>,
    }

    impl ScriptedPicker {
        fn saving(paths: &[&str]) -> Self {
            Self {
                save_paths: paths.iter().map(|p| Some(PathBuf::from(p))).collect(),
            }
        }
    }

    impl PathPicker for ScriptedPicker {
        fn choose_open_path(&mut self) -> Option<PathBuf> {
            None
        }

        fn choose_save_path(&mut self, _default_ext: &str) -> Option<PathBuf> {
            self.save_paths.pop_front().flatten()
        }
    }

    type Snapshot = Vec<(TabId, String, bool, Option<PathBuf>)>;

    fn snapshot(manager: &SessionManager) -> (Snapshot, Option<TabId>) {
        let tabs = manager
            .tabs()
            .iter()
            .map(|tab| {
                (
                    tab.id(),
                    tab.buffer().text(),
                    tab.is_dirty(),
                    tab.file_path().map(Path::to_path_buf),
                )
            })
            .collect();
        (tabs, manager.active_id())
    }

    fn type_into_active(manager: &mut SessionManager, text: &str) {
        manager.active_mut().unwrap().insert_text(text);
    }

    #[test]
    fn test_starts_with_one_empty_tab() {
        let manager = SessionManager::default();
        assert_eq!(manager.tab_count(), 1);
        let tab = manager.active().unwrap();
        assert!(tab.is_pristine());
        assert_eq!(tab.title(), "Untitled");
    }

    #[test]
    fn test_new_tab_becomes_active() {
        let mut manager = SessionManager::default();
        let first = manager.active_id().unwrap();
        let second = manager.new_tab();

        assert_ne!(first, second);
        assert_eq!(manager.active_id(), Some(second));
        assert_eq!(manager.tab_count(), 2);
    }

    #[test]
    fn test_open_notes_scenario() {
        let io = MemoryFileIo::new();
        io.insert("notes.txt", "line1\nline2\nline3");

        let mut manager = SessionManager::default();
        let id = manager.open_file(Path::new("notes.txt"), &io).unwrap();

        // The pristine start-up tab is reused
        assert_eq!(manager.tab_count(), 1);
        let tab = manager.tab_mut(id).unwrap();
        assert_eq!(tab.buffer().line_count(), 3);
        assert_eq!(tab.title(), "notes.txt");
        assert!(!tab.is_dirty());

        let labels: Vec<String> = tab.gutter().unwrap().labels().collect();
        assert_eq!(labels, vec!["1", "2", "3"]);

        assert_eq!(tab.go_to_line(2), Position::at(2, 0));

        let wrap = tab.word_wrap();
        tab.toggle_word_wrap();
        tab.toggle_word_wrap();
        assert_eq!(tab.word_wrap(), wrap);
    }

    #[test]
    fn test_open_creates_tab_when_active_is_not_pristine() {
        let io = MemoryFileIo::new();
        io.insert("a.txt", "a");
        io.insert("b.txt", "b");

        let mut manager = SessionManager::default();
        let a = manager.open_file(Path::new("a.txt"), &io).unwrap();
        let b = manager.open_file(Path::new("b.txt"), &io).unwrap();

        assert_ne!(a, b);
        assert_eq!(manager.tab_count(), 2);
        assert_eq!(manager.active_id(), Some(b));

        // An unbound tab with text is not reused either
        manager.new_tab();
        type_into_active(&mut manager, "draft");
        manager.open_file(Path::new("a.txt"), &io).unwrap();
        assert_eq!(manager.tab_count(), 4);
    }

    #[test]
    fn test_open_failure_changes_nothing() {
        let io = MemoryFileIo::new();
        io.insert("bin.dat", "binary");
        io.fail_reads("bin.dat", FileIoErrorKind::Decode);

        let mut manager = SessionManager::default();
        let before = snapshot(&manager);

        let err = manager.open_file(Path::new("missing.txt"), &io).unwrap_err();
        assert!(matches!(err, SessionError::Io(ref e) if e.kind() == FileIoErrorKind::NotFound));

        let err = manager.open_file(Path::new("bin.dat"), &io).unwrap_err();
        assert!(matches!(err, SessionError::Io(ref e) if e.kind() == FileIoErrorKind::Decode));

        assert_eq!(snapshot(&manager), before);
    }

    #[test]
    fn test_open_latin1_file() {
        let io = MemoryFileIo::new();
        io.insert_bytes("old.txt", b"caf\xE9".to_vec());

        let mut manager = SessionManager::default();
        let id = manager.open_file(Path::new("old.txt"), &io).unwrap();
        let tab = manager.tab(id).unwrap();
        assert_eq!(tab.buffer().text(), "café");
        assert_eq!(tab.encoding(), crate::io::TextEncoding::Latin1);
    }

    #[test]
    fn test_save_bound_tab() {
        let io = MemoryFileIo::new();
        io.insert("notes.txt", "abc");

        let mut manager = SessionManager::default();
        let id = manager.open_file(Path::new("notes.txt"), &io).unwrap();
        manager
            .tab_mut(id)
            .unwrap()
            .replace_range(TextRange::empty(Position::at(1, 3)), "def");
        assert!(manager.tab(id).unwrap().is_dirty());

        let outcome = manager.save_active(&io, &mut NoPathPicker).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(PathBuf::from("notes.txt")));
        assert_eq!(io.contents("notes.txt").as_deref(), Some("abcdef"));
        assert!(!manager.tab(id).unwrap().is_dirty());
    }

    #[test]
    fn test_save_unbound_runs_save_as() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "hello");

        // No path chosen: nothing written, still dirty
        let outcome = manager.save_active(&io, &mut NoPathPicker).unwrap();
        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert!(manager.active().unwrap().is_dirty());

        let mut picker = ScriptedPicker::saving(&["draft"]);
        let outcome = manager.save_active(&io, &mut picker).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved(PathBuf::from("draft.txt")));
        assert_eq!(io.contents("draft.txt").as_deref(), Some("hello"));

        let tab = manager.active().unwrap();
        assert_eq!(tab.title(), "draft.txt");
        assert!(!tab.is_dirty());
    }

    #[test]
    fn test_write_failure_leaves_state_unchanged() {
        let io = MemoryFileIo::new();
        io.fail_writes("full.txt", FileIoErrorKind::DiskFull);

        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "data");
        let id = manager.active_id().unwrap();

        let mut picker = ScriptedPicker::saving(&["full.txt"]);
        let err = manager.save_active(&io, &mut picker).unwrap_err();
        assert!(matches!(err, SessionError::Io(ref e) if e.kind() == FileIoErrorKind::DiskFull));

        let tab = manager.tab(id).unwrap();
        assert!(tab.is_dirty());
        assert!(tab.file_path().is_none());
        assert_eq!(io.contents("full.txt"), None);
    }

    #[test]
    fn test_save_as_keeps_explicit_extension() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default().with_default_extension(".md");
        type_into_active(&mut manager, "# title");

        let mut picker = ScriptedPicker::saving(&["readme", "notes.log"]);
        assert_eq!(
            manager.save_as_active(&io, &mut picker).unwrap(),
            SaveOutcome::Saved(PathBuf::from("readme.md"))
        );
        assert_eq!(
            manager.save_as_active(&io, &mut picker).unwrap(),
            SaveOutcome::Saved(PathBuf::from("notes.log"))
        );
        assert_eq!(manager.active().unwrap().file_path(), Some(Path::new("notes.log")));
    }

    #[test]
    fn test_save_all_reports_per_tab() {
        let io = MemoryFileIo::new();
        io.insert("a.txt", "a");
        io.insert("b.txt", "b");
        io.fail_writes("b.txt", FileIoErrorKind::PermissionDenied);

        let mut manager = SessionManager::default();
        let a = manager.open_file(Path::new("a.txt"), &io).unwrap();
        type_into_active(&mut manager, "1");
        let b = manager.open_file(Path::new("b.txt"), &io).unwrap();
        type_into_active(&mut manager, "2");
        let unbound = manager.new_tab();
        type_into_active(&mut manager, "3");
        let clean = manager.new_tab();

        let report = manager.save_all(&io, &mut NoPathPicker);
        assert_eq!(report.saved, vec![a]);
        assert_eq!(report.skipped, vec![unbound]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, b);
        assert!(!report.is_success());

        assert!(!manager.tab(a).unwrap().is_dirty());
        assert!(manager.tab(b).unwrap().is_dirty());
        assert!(manager.tab(unbound).unwrap().is_dirty());
        assert!(!manager.tab(clean).unwrap().is_dirty());
    }

    #[test]
    fn test_close_clean_tab_needs_no_prompt() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        let first = manager.active_id().unwrap();
        let second = manager.new_tab();

        let mut asked = 0;
        let mut prompt = |_: &str, _: &str| {
            asked += 1;
            Decision::Cancel
        };
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_tab(second, &mut with).unwrap(), CloseOutcome::Closed);
        drop(with);

        assert_eq!(asked, 0);
        assert_eq!(manager.active_id(), Some(first));
    }

    #[test]
    fn test_close_only_tab_leaves_fresh_tab() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "scratch");
        let id = manager.active_id().unwrap();

        let mut prompt = |_: &str, _: &str| Decision::Discard;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_tab(id, &mut with).unwrap(), CloseOutcome::Closed);

        assert_eq!(manager.tab_count(), 1);
        let tab = manager.active().unwrap();
        assert_ne!(tab.id(), id);
        assert!(tab.is_pristine());
        assert_eq!(tab.title(), "Untitled");
    }

    #[test]
    fn test_close_cancel_changes_nothing() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "keep me");
        manager.new_tab();
        type_into_active(&mut manager, "me too");
        let before = snapshot(&manager);

        let mut names = Vec::new();
        let mut prompt = |name: &str, intent: &str| {
            names.push(format!("{}: {}", name, intent));
            Decision::Cancel
        };
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };

        let active = manager.active_id().unwrap();
        assert_eq!(manager.close_tab(active, &mut with).unwrap(), CloseOutcome::Cancelled);
        assert_eq!(manager.close_all(&mut with).unwrap(), CloseOutcome::Cancelled);
        assert_eq!(manager.quit(&mut with).unwrap(), CloseOutcome::Cancelled);
        drop(with);

        assert_eq!(snapshot(&manager), before);
        assert!(!manager.is_terminated());
        assert_eq!(
            names,
            vec![
                "Untitled: Save before closing",
                "Untitled: Save before closing",
                "Untitled: Save before quitting",
            ]
        );
    }

    #[test]
    fn test_close_with_save_writes_then_closes() {
        let io = MemoryFileIo::new();
        io.insert("notes.txt", "abc");
        let mut manager = SessionManager::default();
        let notes = manager.open_file(Path::new("notes.txt"), &io).unwrap();
        type_into_active(&mut manager, ">");
        let other = manager.new_tab();
        manager.select(notes).unwrap();

        let mut prompt = |_: &str, _: &str| Decision::Save;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_tab(notes, &mut with).unwrap(), CloseOutcome::Closed);

        assert_eq!(io.contents("notes.txt").as_deref(), Some(">abc"));
        assert!(manager.tab(notes).is_none());
        assert_eq!(manager.active_id(), Some(other));
    }

    #[test]
    fn test_close_save_without_path_keeps_tab() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "unsaved");
        let id = manager.active_id().unwrap();

        let mut prompt = |_: &str, _: &str| Decision::Save;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_tab(id, &mut with).unwrap(), CloseOutcome::Cancelled);
        assert!(manager.tab(id).unwrap().is_dirty());
    }

    #[test]
    fn test_close_save_failure_keeps_tab() {
        let io = MemoryFileIo::new();
        io.insert("ro.txt", "x");
        io.fail_writes("ro.txt", FileIoErrorKind::PermissionDenied);
        let mut manager = SessionManager::default();
        let id = manager.open_file(Path::new("ro.txt"), &io).unwrap();
        type_into_active(&mut manager, "y");

        let mut prompt = |_: &str, _: &str| Decision::Save;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert!(manager.close_tab(id, &mut with).is_err());
        assert!(manager.tab(id).unwrap().is_dirty());
        assert_eq!(io.contents("ro.txt").as_deref(), Some("x"));
    }

    #[test]
    fn test_close_picks_neighbour_as_active() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        let a = manager.active_id().unwrap();
        let b = manager.new_tab();
        let c = manager.new_tab();

        let mut prompt = |_: &str, _: &str| Decision::Cancel;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };

        manager.select(b).unwrap();
        manager.close_tab(b, &mut with).unwrap();
        assert_eq!(manager.active_id(), Some(c));

        manager.close_tab(c, &mut with).unwrap();
        assert_eq!(manager.active_id(), Some(a));
    }

    #[test]
    fn test_close_all_is_all_or_nothing() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "first");
        manager.new_tab();
        type_into_active(&mut manager, "second");
        let before = snapshot(&manager);

        // Discard the first, cancel on the second
        let mut answers = VecDeque::from([Decision::Discard, Decision::Cancel]);
        let mut prompt = |_: &str, _: &str| answers.pop_front().unwrap_or(Decision::Cancel);
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_all(&mut with).unwrap(), CloseOutcome::Cancelled);
        drop(with);
        assert_eq!(snapshot(&manager), before);

        let mut prompt = |_: &str, _: &str| Decision::Discard;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut NoPathPicker,
        };
        assert_eq!(manager.close_all(&mut with).unwrap(), CloseOutcome::Closed);
        assert_eq!(manager.tab_count(), 1);
        assert!(manager.active().unwrap().is_pristine());
    }

    #[test]
    fn test_quit_terminates() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        type_into_active(&mut manager, "bye");

        let mut picker = ScriptedPicker::saving(&["bye.txt"]);
        let mut prompt = |_: &str, _: &str| Decision::Save;
        let mut with = Collaborators {
            io: &io,
            prompt: &mut prompt,
            picker: &mut picker,
        };
        assert_eq!(manager.quit(&mut with).unwrap(), CloseOutcome::Closed);

        assert!(manager.is_terminated());
        assert_eq!(manager.tab_count(), 0);
        assert!(manager.active().is_none());
        assert_eq!(io.contents("bye.txt").as_deref(), Some("bye"));
    }

    #[test]
    fn test_select_cycles() {
        let mut manager = SessionManager::default();
        let a = manager.active_id().unwrap();
        let b = manager.new_tab();

        assert_eq!(manager.select_next(), Some(a));
        assert_eq!(manager.select_next(), Some(b));
        assert_eq!(manager.select_prev(), Some(a));
        assert_eq!(manager.select_prev(), Some(b));
    }

    #[test]
    fn test_unknown_tab() {
        let io = MemoryFileIo::new();
        let mut manager = SessionManager::default();
        let ghost = TabId::new(999);

        assert!(matches!(manager.select(ghost), Err(SessionError::UnknownTab(id)) if id == ghost));
        assert!(manager.write_tab(ghost, Path::new("x.txt"), &io).is_err());
    }

    #[test]
    fn test_default_extension() {
        assert_eq!(
            with_default_extension(PathBuf::from("a"), "txt"),
            PathBuf::from("a.txt")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("a.rs"), "txt"),
            PathBuf::from("a.rs")
        );
        assert_eq!(with_default_extension(PathBuf::from("a"), ""), PathBuf::from("a"));
    }
}
