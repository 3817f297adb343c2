//! Application layer for tabpad.
//!
//! Front ends translate menu items, key bindings or console lines into a
//! [`Command`] and hand it to [`App::dispatch`] together with the dialogs
//! the command may need. Results come back as a [`CommandResult`] to show
//! in the status area.

mod app;
mod command;

pub use app::{App, Dialogs, ABOUT_TEXT, READY};
pub use command::{Command, CommandResult};
