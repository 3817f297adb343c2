//! Multi-document session model for tabpad.
//!
//! A [`SessionManager`] owns an ordered list of [`TabSession`]s, each with
//! its own buffer, bound file, dirty flag and view state. File access and
//! user questions go through the [`FileIo`], [`ConfirmationPrompt`] and
//! [`PathPicker`] traits; nothing here renders or blocks on a UI.

pub mod error;
pub mod io;
pub mod manager;
pub mod prompt;
pub mod tab;

pub use error::{FileIoError, FileIoErrorKind, GoToLineError, SessionError};
pub use io::{decode_text, FileIo, FsFileIo, LoadedText, MemoryFileIo, TextEncoding};
pub use manager::{
    with_default_extension, CloseOutcome, Collaborators, SaveAllReport, SaveOutcome,
    SessionManager, DEFAULT_EXTENSION,
};
pub use prompt::{CloseIntent, ConfirmationPrompt, Decision, NoPathPicker, PathPicker};
pub use tab::{TabDefaults, TabId, TabSession, UNTITLED};
