//! Command dispatcher over a session manager.

use std::path::PathBuf;

use tabpad_buffer::TextBuffer;
use tabpad_clipboard::Clipboard;
use tabpad_config::Config;
use tabpad_session::{
    CloseOutcome, Collaborators, ConfirmationPrompt, FileIo, PathPicker, SaveOutcome,
    SessionManager, TabDefaults, TabSession,
};

use crate::command::{Command, CommandResult};

/// Status line text when no tab is active
pub const READY: &str = "Ready";

/// Text of the About command
pub const ABOUT_TEXT: &str = concat!(
    "Tabpad ",
    env!("CARGO_PKG_VERSION"),
    "\nA multi-tab plain-text editor."
);

/// The user-facing dialogs a command may need
pub struct Dialogs<'a> {
    pub prompt: &'a mut dyn ConfirmationPrompt,
    pub picker: &'a mut dyn PathPicker,
}

/// Application state: the open tabs plus everything commands act through.
pub struct App<IO: FileIo> {
    sessions: SessionManager,
    config: Config,
    io: IO,
    clipboard: Clipboard,
    last_message: Option<CommandResult>,
}

impl<IO: FileIo> App<IO> {
    /// Create the application with one empty tab, configured from `config`
    pub fn new(config: Config, io: IO) -> Self {
        Self::with_clipboard(config, io, Clipboard::new())
    }

    pub fn with_clipboard(config: Config, io: IO, clipboard: Clipboard) -> Self {
        let editor = &config.editor;
        let defaults = TabDefaults {
            show_line_numbers: editor.show_line_numbers,
            word_wrap: editor.word_wrap,
            history_size: editor.history_size,
            wheel_scroll_lines: editor.wheel_scroll_lines,
            ..TabDefaults::default()
        };
        let sessions =
            SessionManager::new(defaults).with_default_extension(editor.default_extension.clone());
        tabpad_logger::info(format!(
            "Clipboard backend: {}",
            if clipboard.is_system() { "system" } else { "in-process" }
        ));

        Self {
            sessions,
            config,
            io,
            clipboard,
            last_message: None,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn io(&self) -> &IO {
        &self.io
    }

    pub fn active_tab(&self) -> Option<&TabSession> {
        self.sessions.active()
    }

    /// True once a quit went through
    pub fn should_quit(&self) -> bool {
        self.sessions.is_terminated()
    }

    /// Message of the last command that reported something
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_ref().and_then(CommandResult::message)
    }

    /// Status line of the active tab, or "Ready"
    pub fn status_line(&self) -> String {
        self.sessions
            .active()
            .map(TabSession::status_text)
            .unwrap_or_else(|| READY.to_string())
    }

    /// Window title derived from the active tab
    pub fn window_title(&self) -> String {
        match self.sessions.active() {
            Some(tab) => format!("{} - Tabpad", tab.title()),
            None => "Tabpad".to_string(),
        }
    }

    /// Run one command and record/log what it reported
    pub fn dispatch(&mut self, command: Command, dialogs: &mut Dialogs<'_>) -> CommandResult {
        if self.sessions.is_terminated() {
            return CommandResult::Quit;
        }

        let result = self.execute(command, dialogs);
        match &result {
            CommandResult::Info(msg) => tabpad_logger::info(msg.as_str()),
            CommandResult::Warning(msg) => tabpad_logger::warn(msg.as_str()),
            CommandResult::Error(msg) => tabpad_logger::error(msg.as_str()),
            CommandResult::None | CommandResult::Quit => {}
        }
        if result != CommandResult::None {
            self.last_message = Some(result.clone());
        }
        result
    }

    fn execute(&mut self, command: Command, dialogs: &mut Dialogs<'_>) -> CommandResult {
        match command {
            Command::NewTab => {
                self.sessions.new_tab();
                CommandResult::None
            }
            Command::Open(path) => self.open(path, dialogs),
            Command::Save => {
                let outcome = self.sessions.save_active(&self.io, &mut *dialogs.picker);
                save_result(outcome)
            }
            Command::SaveAs => {
                let outcome = self.sessions.save_as_active(&self.io, &mut *dialogs.picker);
                save_result(outcome)
            }
            Command::SaveAll => self.save_all(dialogs),
            Command::CloseTab => {
                let mut with = Collaborators {
                    io: &self.io,
                    prompt: &mut *dialogs.prompt,
                    picker: &mut *dialogs.picker,
                };
                close_result(self.sessions.close_active(&mut with))
            }
            Command::CloseAll => {
                let mut with = Collaborators {
                    io: &self.io,
                    prompt: &mut *dialogs.prompt,
                    picker: &mut *dialogs.picker,
                };
                close_result(self.sessions.close_all(&mut with))
            }
            Command::Quit => {
                let mut with = Collaborators {
                    io: &self.io,
                    prompt: &mut *dialogs.prompt,
                    picker: &mut *dialogs.picker,
                };
                match self.sessions.quit(&mut with) {
                    Ok(CloseOutcome::Closed) => CommandResult::Quit,
                    Ok(CloseOutcome::Cancelled) => CommandResult::None,
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }
            Command::Undo => self.with_active(|tab| {
                if tab.undo() {
                    CommandResult::None
                } else {
                    CommandResult::Info("Nothing to undo".to_string())
                }
            }),
            Command::Redo => self.with_active(|tab| {
                if tab.redo() {
                    CommandResult::None
                } else {
                    CommandResult::Info("Nothing to redo".to_string())
                }
            }),
            Command::Cut => self.cut(),
            Command::Copy => self.copy(),
            Command::Paste => self.paste(),
            Command::SelectAll => self.with_active(|tab| {
                tab.edit(TextBuffer::select_all);
                CommandResult::None
            }),
            Command::InsertText(text) => self.with_active(|tab| {
                tab.insert_text(&text);
                CommandResult::None
            }),
            Command::MoveCursor(pos) => self.with_active(|tab| {
                tab.edit(|buffer| buffer.set_cursor(pos));
                CommandResult::None
            }),
            Command::Select(selection) => self.with_active(|tab| {
                tab.edit(|buffer| buffer.set_selection(Some(selection)));
                CommandResult::None
            }),
            Command::GoToLine(input) => self.with_active(|tab| match tab.go_to_line_input(&input) {
                Ok(_) => CommandResult::None,
                Err(e) => CommandResult::Warning(e.to_string()),
            }),
            Command::Find(query) => self.find(query, false),
            Command::FindPrevious(query) => self.find(query, true),
            Command::Replace { query, replacement } => {
                if query.is_empty() {
                    return CommandResult::Warning("Enter text to find".to_string());
                }
                self.with_active(|tab| {
                    if tab.replace_one(&query, &replacement) {
                        CommandResult::None
                    } else {
                        CommandResult::Info(format!("'{}' not found", query))
                    }
                })
            }
            Command::ReplaceAll { query, replacement } => {
                if query.is_empty() {
                    return CommandResult::Warning("Enter text to find".to_string());
                }
                self.with_active(|tab| match tab.replace_all(&query, &replacement) {
                    0 => CommandResult::Info(format!("'{}' not found", query)),
                    count => CommandResult::Info(format!("Replaced {} occurrence(s)", count)),
                })
            }
            Command::ToggleLineNumbers => self.with_active(|tab| {
                tab.toggle_line_numbers();
                CommandResult::None
            }),
            Command::ToggleWordWrap => self.with_active(|tab| {
                tab.toggle_word_wrap();
                CommandResult::None
            }),
            Command::Scroll(request) => self.with_active(|tab| {
                tab.scroll(request);
                CommandResult::None
            }),
            Command::Resize { width, height } => {
                self.sessions.resize_views(width, height);
                CommandResult::None
            }
            Command::SelectTab(id) => match self.sessions.select(id) {
                Ok(()) => CommandResult::None,
                Err(e) => CommandResult::Error(e.to_string()),
            },
            Command::NextTab => {
                self.sessions.select_next();
                CommandResult::None
            }
            Command::PrevTab => {
                self.sessions.select_prev();
                CommandResult::None
            }
            Command::About => CommandResult::Info(ABOUT_TEXT.to_string()),
        }
    }

    fn with_active(&mut self, f: impl FnOnce(&mut TabSession) -> CommandResult) -> CommandResult {
        match self.sessions.active_mut() {
            Some(tab) => f(tab),
            None => CommandResult::None,
        }
    }

    fn open(&mut self, path: Option<PathBuf>, dialogs: &mut Dialogs<'_>) -> CommandResult {
        let Some(path) = path.or_else(|| dialogs.picker.choose_open_path()) else {
            return CommandResult::None;
        };
        match self.sessions.open_file(&path, &self.io) {
            Ok(_) => CommandResult::Info(format!("Opened {}", path.display())),
            Err(e) => CommandResult::Error(format!("Could not open file: {}", e)),
        }
    }

    fn save_all(&mut self, dialogs: &mut Dialogs<'_>) -> CommandResult {
        let report = self.sessions.save_all(&self.io, &mut *dialogs.picker);
        if report.failed.is_empty() {
            return CommandResult::Info(format!("Saved {} file(s)", report.saved.len()));
        }
        let failures = report
            .failed
            .iter()
            .map(|(_, e)| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        CommandResult::Error(format!(
            "Failed to save {} file(s): {}",
            report.failed.len(),
            failures
        ))
    }

    fn cut(&mut self) -> CommandResult {
        let Some(tab) = self.sessions.active_mut() else {
            return CommandResult::None;
        };
        let Some(selection) = tab.buffer().selection().filter(|s| !s.is_empty()) else {
            return CommandResult::None;
        };
        let text = tab.buffer().get_text(selection.range());
        if let Err(e) = self.clipboard.cut(&text) {
            return CommandResult::Error(e);
        }
        tab.replace_range(selection.range(), "");
        CommandResult::None
    }

    fn copy(&mut self) -> CommandResult {
        let Some(text) = self
            .sessions
            .active()
            .and_then(|tab| tab.buffer().selected_text())
            .filter(|text| !text.is_empty())
        else {
            return CommandResult::None;
        };
        match self.clipboard.copy(&text) {
            Ok(()) => CommandResult::None,
            Err(e) => CommandResult::Error(e),
        }
    }

    fn paste(&mut self) -> CommandResult {
        let Some(text) = self.clipboard.paste() else {
            return CommandResult::None;
        };
        self.with_active(|tab| {
            tab.insert_text(&text);
            CommandResult::None
        })
    }

    fn find(&mut self, query: String, backward: bool) -> CommandResult {
        if query.is_empty() {
            return CommandResult::Warning("Enter text to find".to_string());
        }
        self.with_active(|tab| {
            let found = if backward {
                tab.find_previous(&query)
            } else {
                tab.find_next(&query)
            };
            match found {
                Some(_) => CommandResult::None,
                None => CommandResult::Info(format!("'{}' not found", query)),
            }
        })
    }
}

fn save_result(outcome: Result<SaveOutcome, tabpad_session::SessionError>) -> CommandResult {
    match outcome {
        Ok(SaveOutcome::Saved(path)) => CommandResult::Info(format!("Saved {}", path.display())),
        Ok(SaveOutcome::Cancelled) => CommandResult::None,
        Err(e) => CommandResult::Error(format!("Could not save file: {}", e)),
    }
}

fn close_result(outcome: Result<CloseOutcome, tabpad_session::SessionError>) -> CommandResult {
    match outcome {
        Ok(_) => CommandResult::None,
        Err(e) => CommandResult::Error(format!("Could not save file: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tabpad_buffer::{Position, Selection};
    use tabpad_session::{Decision, MemoryFileIo, NoPathPicker};

    use super::*;

    fn app() -> App<MemoryFileIo> {
        App::with_clipboard(Config::default(), MemoryFileIo::new(), Clipboard::in_process())
    }

    fn run(app: &mut App<MemoryFileIo>, command: Command, decision: Decision) -> CommandResult {
        let mut prompt = move |_: &str, _: &str| decision;
        let mut picker = NoPathPicker;
        let mut dialogs = Dialogs {
            prompt: &mut prompt,
            picker: &mut picker,
        };
        app.dispatch(command, &mut dialogs)
    }

    fn text(app: &App<MemoryFileIo>) -> String {
        app.active_tab().unwrap().buffer().text()
    }

    #[test]
    fn test_status_line_and_title() {
        let mut app = app();
        assert_eq!(app.status_line(), "Untitled | Ln 1, Col 1");
        assert_eq!(app.window_title(), "Untitled - Tabpad");

        run(&mut app, Command::InsertText("ab\nc".into()), Decision::Cancel);
        assert_eq!(app.status_line(), "Untitled * | Ln 2, Col 2");
        assert_eq!(app.window_title(), "Untitled * - Tabpad");
    }

    #[test]
    fn test_open_and_edit_file() {
        let mut app = app();
        app.io().insert("notes.txt", "line1\nline2\nline3");

        let result = run(&mut app, Command::Open(Some("notes.txt".into())), Decision::Cancel);
        assert_eq!(result, CommandResult::Info("Opened notes.txt".to_string()));
        assert_eq!(app.sessions().tab_count(), 1);

        run(&mut app, Command::GoToLine("2".into()), Decision::Cancel);
        run(&mut app, Command::InsertText(">".into()), Decision::Cancel);
        assert_eq!(text(&app), "line1\n>line2\nline3");

        let result = run(&mut app, Command::Save, Decision::Cancel);
        assert_eq!(result, CommandResult::Info("Saved notes.txt".to_string()));
        assert_eq!(
            app.io().contents("notes.txt").as_deref(),
            Some("line1\n>line2\nline3")
        );
        assert!(!app.active_tab().unwrap().is_dirty());
    }

    #[test]
    fn test_open_missing_file_reports_error() {
        let mut app = app();
        let result = run(&mut app, Command::Open(Some("nope.txt".into())), Decision::Cancel);

        assert!(result.is_error());
        assert_eq!(
            app.last_message(),
            Some("Could not open file: file not found: nope.txt")
        );
        assert!(app.active_tab().unwrap().is_pristine());
    }

    #[test]
    fn test_open_without_path_asks_picker() {
        let mut app = app();
        let result = run(&mut app, Command::Open(None), Decision::Cancel);
        assert_eq!(result, CommandResult::None);
        assert_eq!(app.sessions().tab_count(), 1);
    }

    #[test]
    fn test_go_to_line_rejects_text() {
        let mut app = app();
        let result = run(&mut app, Command::GoToLine("abc".into()), Decision::Cancel);
        assert_eq!(
            result,
            CommandResult::Warning("'abc' is not a valid line number".to_string())
        );
    }

    #[test]
    fn test_find_and_replace() {
        let mut app = app();
        run(&mut app, Command::InsertText("aXaXa".into()), Decision::Cancel);

        let result = run(&mut app, Command::Find("zzz".into()), Decision::Cancel);
        assert_eq!(result, CommandResult::Info("'zzz' not found".to_string()));

        let result = run(
            &mut app,
            Command::ReplaceAll {
                query: "a".into(),
                replacement: "bb".into(),
            },
            Decision::Cancel,
        );
        assert_eq!(result, CommandResult::Info("Replaced 3 occurrence(s)".to_string()));
        assert_eq!(text(&app), "bbXbbXbb");

        run(&mut app, Command::Undo, Decision::Cancel);
        assert_eq!(text(&app), "aXaXa");

        let result = run(&mut app, Command::Find(String::new()), Decision::Cancel);
        assert!(matches!(result, CommandResult::Warning(_)));
    }

    #[test]
    fn test_cut_copy_paste() {
        let mut app = app();
        run(&mut app, Command::InsertText("hello world".into()), Decision::Cancel);
        run(
            &mut app,
            Command::Select(Selection::new(Position::at(1, 0), Position::at(1, 6))),
            Decision::Cancel,
        );

        run(&mut app, Command::Cut, Decision::Cancel);
        assert_eq!(text(&app), "world");

        run(&mut app, Command::MoveCursor(Position::at(1, 5)), Decision::Cancel);
        run(&mut app, Command::Paste, Decision::Cancel);
        assert_eq!(text(&app), "worldhello ");

        run(&mut app, Command::SelectAll, Decision::Cancel);
        run(&mut app, Command::Copy, Decision::Cancel);
        run(&mut app, Command::NewTab, Decision::Cancel);
        run(&mut app, Command::Paste, Decision::Cancel);
        assert_eq!(text(&app), "worldhello ");
    }

    #[test]
    fn test_quit_with_cancel_keeps_running() {
        let mut app = app();
        run(&mut app, Command::InsertText("unsaved".into()), Decision::Cancel);

        assert_eq!(run(&mut app, Command::Quit, Decision::Cancel), CommandResult::None);
        assert!(!app.should_quit());
        assert_eq!(text(&app), "unsaved");

        assert_eq!(run(&mut app, Command::Quit, Decision::Discard), CommandResult::Quit);
        assert!(app.should_quit());
        assert_eq!(app.status_line(), READY);
        assert_eq!(run(&mut app, Command::NewTab, Decision::Cancel), CommandResult::Quit);
    }

    #[test]
    fn test_close_tab_with_discard() {
        let mut app = app();
        run(&mut app, Command::InsertText("scratch".into()), Decision::Cancel);
        run(&mut app, Command::CloseTab, Decision::Discard);

        assert_eq!(app.sessions().tab_count(), 1);
        assert!(app.active_tab().unwrap().is_pristine());
    }

    #[test]
    fn test_save_all_reports_failures() {
        let mut app = app();
        app.io().insert("a.txt", "a");
        app.io()
            .fail_writes("a.txt", tabpad_session::FileIoErrorKind::PermissionDenied);
        run(&mut app, Command::Open(Some("a.txt".into())), Decision::Cancel);
        run(&mut app, Command::InsertText("!".into()), Decision::Cancel);

        let result = run(&mut app, Command::SaveAll, Decision::Cancel);
        assert_eq!(
            result,
            CommandResult::Error("Failed to save 1 file(s): permission denied: a.txt".to_string())
        );
        assert!(app.active_tab().unwrap().is_dirty());
        assert_eq!(app.active_tab().unwrap().file_path(), Some(Path::new("a.txt")));
    }

    #[test]
    fn test_config_defaults_reach_tabs() {
        let mut config = Config::default();
        config.editor.show_line_numbers = false;
        config.editor.word_wrap = true;
        let mut app = App::with_clipboard(config, MemoryFileIo::new(), Clipboard::in_process());

        run(&mut app, Command::NewTab, Decision::Cancel);
        let tab = app.active_tab().unwrap();
        assert!(tab.gutter().is_none());
        assert!(tab.word_wrap());

        run(&mut app, Command::ToggleLineNumbers, Decision::Cancel);
        assert!(app.active_tab().unwrap().gutter().is_some());
    }

    #[test]
    fn test_tab_switching_and_resize() {
        let mut app = app();
        let first = app.sessions().active_id().unwrap();
        run(&mut app, Command::NewTab, Decision::Cancel);
        run(&mut app, Command::Resize { width: 40, height: 5 }, Decision::Cancel);

        run(&mut app, Command::NextTab, Decision::Cancel);
        assert_eq!(app.sessions().active_id(), Some(first));
        assert_eq!(app.active_tab().unwrap().viewport().height(), 5);

        run(&mut app, Command::PrevTab, Decision::Cancel);
        assert_ne!(app.sessions().active_id(), Some(first));
        run(&mut app, Command::SelectTab(first), Decision::Cancel);
        assert_eq!(app.sessions().active_id(), Some(first));
    }

    #[test]
    fn test_about() {
        let mut app = app();
        let result = run(&mut app, Command::About, Decision::Cancel);
        assert!(result.message().unwrap().starts_with("Tabpad "));
    }
}
