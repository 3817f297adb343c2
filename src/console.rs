//! Line-oriented console front end.
//!
//! Lines starting with `:` are commands; any other line is typed into the
//! active tab followed by a newline. Dialogs (unsaved-changes questions,
//! file paths) are answered on the next input line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use tabpad_app::{App, Command, CommandResult, Dialogs};
use tabpad_buffer::{Position, Selection};
use tabpad_logger::{LogEntry, LogLevel};
use tabpad_session::{ConfirmationPrompt, Decision, FileIo, PathPicker, TabSession};
use tabpad_viewport::ScrollRequest;

const HELP: &str = "\
Commands:
  :new                 new tab
  :open [PATH]         open a file
  :save  :saveas  :saveall
  :close  :closeall  :quit
  :undo  :redo  :cut  :copy  :paste  :selectall
  :cursor L:C          move the cursor
  :select L:C L:C      select a range
  :goto N              go to line N
  :find TEXT  :findprev TEXT
  :replace /FIND/WITH  :replaceall /FIND/WITH
  :lines  :wrap        toggle line numbers / word wrap
  :scroll N  :page N   scroll by lines / pages
  :wheel DELTA         scroll by a wheel delta (120 per notch)
  :top FRACTION        scroll to a fraction of the document
  :size W H            resize the view
  :next  :prev         switch tabs
  :log [N]             show the last N log messages (default 20)
  :loglevel LEVEL      debug, info, warn or error
  :show  :about  :help
Other lines are inserted as text.";

/// What a console line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(Command),
    Show,
    Help,
    /// Show the most recent log messages
    Log(usize),
    SetLogLevel(LogLevel),
}

const DEFAULT_LOG_LINES: usize = 20;

/// Parse one console line
pub fn parse_line(line: &str) -> Result<Input, String> {
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Input::Command(Command::InsertText(format!("{}\n", line))));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest.trim(), ""),
    };

    let command = match name {
        "new" => Command::NewTab,
        "open" if arg.is_empty() => Command::Open(None),
        "open" => Command::Open(Some(PathBuf::from(arg))),
        "save" => Command::Save,
        "saveas" => Command::SaveAs,
        "saveall" => Command::SaveAll,
        "close" => Command::CloseTab,
        "closeall" => Command::CloseAll,
        "quit" | "q" => Command::Quit,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "cut" => Command::Cut,
        "copy" => Command::Copy,
        "paste" => Command::Paste,
        "selectall" => Command::SelectAll,
        "cursor" => Command::MoveCursor(parse_position(arg)?),
        "select" => {
            let (anchor, active) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: :select L:C L:C".to_string())?;
            Command::Select(Selection::new(
                parse_position(anchor)?,
                parse_position(active.trim())?,
            ))
        }
        "goto" => Command::GoToLine(arg.to_string()),
        "find" => Command::Find(arg.to_string()),
        "findprev" => Command::FindPrevious(arg.to_string()),
        "replace" => {
            let (query, replacement) = parse_pair(arg)?;
            Command::Replace { query, replacement }
        }
        "replaceall" => {
            let (query, replacement) = parse_pair(arg)?;
            Command::ReplaceAll { query, replacement }
        }
        "lines" => Command::ToggleLineNumbers,
        "wrap" => Command::ToggleWordWrap,
        "scroll" => Command::Scroll(ScrollRequest::Lines(parse_number(arg)?)),
        "page" => Command::Scroll(ScrollRequest::Pages(parse_number(arg)?)),
        "wheel" => Command::Scroll(ScrollRequest::Wheel(parse_number(arg)?)),
        "top" => Command::Scroll(ScrollRequest::Fraction(parse_number(arg)?)),
        "size" => {
            let mut parts = arg.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(w), Some(h)) => Command::Resize {
                    width: parse_number(w)?,
                    height: parse_number(h)?,
                },
                _ => return Err("Usage: :size W H".to_string()),
            }
        }
        "next" => Command::NextTab,
        "prev" => Command::PrevTab,
        "about" => Command::About,
        "show" => return Ok(Input::Show),
        "help" => return Ok(Input::Help),
        "log" if arg.is_empty() => return Ok(Input::Log(DEFAULT_LOG_LINES)),
        "log" => return Ok(Input::Log(parse_number(arg)?)),
        "loglevel" => return arg.parse().map(Input::SetLogLevel),
        other => return Err(format!("Unknown command ':{}' (try :help)", other)),
    };
    Ok(Input::Command(command))
}

fn parse_number<T: std::str::FromStr>(arg: &str) -> Result<T, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", arg))
}

/// `L:C` with a 1-based line and 1-based column
fn parse_position(arg: &str) -> Result<Position, String> {
    let (line, column) = arg.split_once(':').unwrap_or((arg, "1"));
    let line: usize = parse_number(line)?;
    let column: usize = parse_number(column)?;
    Ok(Position::at(line, column.saturating_sub(1)))
}

/// `/find/with`, where the first character is the delimiter
fn parse_pair(arg: &str) -> Result<(String, String), String> {
    let mut chars = arg.chars();
    let delimiter = chars
        .next()
        .ok_or_else(|| "Usage: /FIND/WITH".to_string())?;
    let mut parts = chars.as_str().splitn(3, delimiter);
    match (parts.next(), parts.next()) {
        (Some(query), Some(replacement)) => Ok((query.to_string(), replacement.to_string())),
        _ => Err("Usage: /FIND/WITH".to_string()),
    }
}

/// Read one line of stdin; `None` at end of input
fn read_answer() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

/// Unsaved-changes question answered with y/n/c
pub struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
    fn ask(&mut self, file_name: &str, intent: &str) -> Decision {
        loop {
            print!("{}: {}? [y]es / [n]o / [c]ancel: ", file_name, intent);
            let _ = io::stdout().flush();
            let Some(answer) = read_answer() else {
                return Decision::Cancel;
            };
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Decision::Save,
                "n" | "no" => return Decision::Discard,
                "c" | "cancel" => return Decision::Cancel,
                _ => println!("Please answer y, n or c."),
            }
        }
    }
}

/// Path dialog: an empty answer cancels
pub struct StdinPicker;

impl StdinPicker {
    fn ask(question: &str) -> Option<PathBuf> {
        print!("{}: ", question);
        let _ = io::stdout().flush();
        read_answer()
            .map(|answer| answer.trim().to_string())
            .filter(|answer| !answer.is_empty())
            .map(PathBuf::from)
    }
}

impl PathPicker for StdinPicker {
    fn choose_open_path(&mut self) -> Option<PathBuf> {
        Self::ask("Open file")
    }

    fn choose_save_path(&mut self, default_ext: &str) -> Option<PathBuf> {
        Self::ask(&format!("Save as (default extension .{})", default_ext))
    }
}

/// The last `limit` entries, oldest first
fn render_log(entries: &[LogEntry], limit: usize) -> String {
    if entries.is_empty() {
        return "No log messages".to_string();
    }
    let skip = entries.len().saturating_sub(limit);
    entries[skip..]
        .iter()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab bar, visible lines with the gutter, and the status line
pub fn render<IO: FileIo>(app: &App<IO>) -> String {
    let mut out = String::new();

    let active = app.sessions().active_id();
    let tabs: Vec<String> = app
        .sessions()
        .tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let marker = if Some(tab.id()) == active { ">" } else { " " };
            format!("{}{} {}", marker, i + 1, tab.title())
        })
        .collect();
    out.push_str(&tabs.join(" | "));
    out.push('\n');

    if let Some(tab) = app.active_tab() {
        render_tab(tab, &mut out);
    }

    out.push_str("-- ");
    out.push_str(&app.status_line());
    out
}

fn render_tab(tab: &TabSession, out: &mut String) {
    let buffer = tab.buffer();
    let viewport = tab.viewport();
    let first = viewport.first_visible_line();
    let last = viewport.last_visible_line(buffer.line_count());
    let labels = tab.gutter().map(|gutter| gutter.render());

    for (i, line) in (first..=last).enumerate() {
        let mut text = buffer.line(line).unwrap_or_default();
        if !tab.word_wrap() && viewport.width() > 0 {
            text = text.chars().take(viewport.width()).collect();
        }
        match labels.as_ref().and_then(|labels| labels.get(i)) {
            Some(label) => out.push_str(&format!("{} | {}\n", label, text)),
            None => out.push_str(&format!("{}\n", text)),
        }
    }
}

/// Read commands from stdin until quit or end of input
pub fn run<IO: FileIo>(app: &mut App<IO>) -> Result<()> {
    let mut prompt = StdinPrompt;
    let mut picker = StdinPicker;

    println!("{}", render(app));
    while let Some(line) = read_answer() {
        let input = match parse_line(&line) {
            Ok(input) => input,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        let command = match input {
            Input::Show => {
                println!("{}", render(app));
                continue;
            }
            Input::Help => {
                println!("{}", HELP);
                continue;
            }
            Input::Log(limit) => {
                if tabpad_logger::is_initialized() {
                    println!("{}", render_log(&tabpad_logger::get_entries(), limit));
                } else {
                    println!("Logging is not initialized");
                }
                continue;
            }
            Input::SetLogLevel(level) => {
                tabpad_logger::set_min_level(level);
                tabpad_logger::info(format!("Log level set to {}", level));
                println!("Log level: {}", level);
                continue;
            }
            Input::Command(command) => command,
        };

        let mut dialogs = Dialogs {
            prompt: &mut prompt,
            picker: &mut picker,
        };
        let result = app.dispatch(command, &mut dialogs);
        if let Some(msg) = result.message() {
            println!("{}", msg);
        }
        if result == CommandResult::Quit {
            break;
        }
        println!("-- {}", app.status_line());
    }

    if !app.should_quit() && app.sessions().has_unsaved_changes() {
        tabpad_logger::warn("Input closed with unsaved changes");
        eprintln!("Input closed; unsaved changes were not written.");
    }
    io::stdout().flush()?;
    Ok(())
}
