//! File access contract and its implementations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::{UTF_8, WINDOWS_1252};

use crate::error::{FileIoError, FileIoErrorKind};

/// Encoding a file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// Legacy single-byte fallback (ISO-8859-1 as mapped by Windows-1252)
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => f.write_str("UTF-8"),
            TextEncoding::Latin1 => f.write_str("Latin-1"),
        }
    }
}

/// Decoded file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Reads and writes whole text files.
///
/// The core never touches the filesystem directly; every load and save
/// goes through this trait so callers can substitute their own storage.
pub trait FileIo {
    /// Read and decode the file at `path`
    fn read(&self, path: &Path) -> Result<LoadedText, FileIoError>;

    /// Write `text` to `path`, replacing its content
    fn write(&self, path: &Path, text: &str) -> Result<(), FileIoError>;
}

/// Decode raw bytes: UTF-8 first, then the legacy single-byte encoding.
/// Only if both fail is the file reported as undecodable.
pub fn decode_text(path: &Path, bytes: &[u8]) -> Result<LoadedText, FileIoError> {
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string();
        return Ok(LoadedText {
            text,
            encoding: TextEncoding::Utf8,
        });
    }

    match WINDOWS_1252.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => Ok(LoadedText {
            text: text.into_owned(),
            encoding: TextEncoding::Latin1,
        }),
        None => Err(FileIoError::new(FileIoErrorKind::Decode, path)),
    }
}

/// [`FileIo`] backed by the local filesystem. Files are written as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileIo;

impl FileIo for FsFileIo {
    fn read(&self, path: &Path) -> Result<LoadedText, FileIoError> {
        let bytes = std::fs::read(path).map_err(|e| FileIoError::from_io(path, e))?;
        decode_text(path, &bytes)
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), FileIoError> {
        std::fs::write(path, text).map_err(|e| FileIoError::from_io(path, e))
    }
}

/// In-memory [`FileIo`] for scripted runs and tests.
///
/// Individual paths can be made to fail on read or write with a chosen
/// error kind.
#[derive(Debug, Default)]
pub struct MemoryFileIo {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    read_failures: RefCell<HashMap<PathBuf, FileIoErrorKind>>,
    write_failures: RefCell<HashMap<PathBuf, FileIoErrorKind>>,
}

impl MemoryFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a file with text content
    pub fn insert(&self, path: impl Into<PathBuf>, text: &str) {
        self.insert_bytes(path, text.as_bytes().to_vec());
    }

    /// Store a file with raw bytes
    pub fn insert_bytes(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.borrow_mut().insert(path.into(), bytes);
    }

    /// Current content of a stored file, lossily decoded
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .borrow()
            .get(path.as_ref())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn fail_reads(&self, path: impl Into<PathBuf>, kind: FileIoErrorKind) {
        self.read_failures.borrow_mut().insert(path.into(), kind);
    }

    pub fn fail_writes(&self, path: impl Into<PathBuf>, kind: FileIoErrorKind) {
        self.write_failures.borrow_mut().insert(path.into(), kind);
    }

    /// Stop failing writes to `path`
    pub fn allow_writes(&self, path: impl AsRef<Path>) {
        self.write_failures.borrow_mut().remove(path.as_ref());
    }
}

impl FileIo for MemoryFileIo {
    fn read(&self, path: &Path) -> Result<LoadedText, FileIoError> {
        if let Some(kind) = self.read_failures.borrow().get(path) {
            return Err(FileIoError::new(*kind, path));
        }
        let files = self.files.borrow();
        let bytes = files
            .get(path)
            .ok_or_else(|| FileIoError::new(FileIoErrorKind::NotFound, path))?;
        decode_text(path, bytes)
    }

    fn write(&self, path: &Path, text: &str) -> Result<(), FileIoError> {
        if let Some(kind) = self.write_failures.borrow().get(path) {
            return Err(FileIoError::new(*kind, path));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), text.as_bytes().to_vec());
        Ok(())
    }
}
