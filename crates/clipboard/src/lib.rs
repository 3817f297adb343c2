//! Clipboard operations for tabpad.
//!
//! Provides cross-platform clipboard access using arboard.
//! On Linux, supports both CLIPBOARD and PRIMARY selections. When no system
//! clipboard is reachable (headless sessions, tests) text is kept in
//! process so cut/copy/paste between tabs still works.

use std::fmt;

#[cfg(target_os = "linux")]
use arboard::{GetExtLinux, LinuxClipboardKind, SetExtLinux};

/// Clipboard with an in-process fallback
pub struct Clipboard {
    system: Option<arboard::Clipboard>,
    /// Last text copied through this handle
    local: Option<String>,
}

impl fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clipboard")
            .field("system", &self.system.is_some())
            .field("local", &self.local)
            .finish()
    }
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard {
    /// Connect to the system clipboard, falling back to in-process storage
    pub fn new() -> Self {
        let system = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tabpad_logger::warn(format!(
                    "System clipboard unavailable, using in-process clipboard: {}",
                    e
                ));
                None
            }
        };
        Self {
            system,
            local: None,
        }
    }

    /// Clipboard that never touches the system clipboard
    pub fn in_process() -> Self {
        Self {
            system: None,
            local: None,
        }
    }

    /// Whether a system clipboard is connected
    pub fn is_system(&self) -> bool {
        self.system.is_some()
    }

    /// Copy text to the clipboard.
    ///
    /// On Linux, copies to BOTH CLIPBOARD and PRIMARY selections.
    /// The text is always kept in process as well.
    pub fn copy(&mut self, text: &str) -> Result<(), String> {
        if text.is_empty() {
            return Err("Cannot copy empty text".to_string());
        }
        self.local = Some(text.to_string());

        if let Some(clipboard) = self.system.as_mut() {
            #[cfg(target_os = "linux")]
            {
                // Copy to CLIPBOARD selection (Ctrl+C/V)
                clipboard
                    .set()
                    .clipboard(LinuxClipboardKind::Clipboard)
                    .text(text.to_string())
                    .map_err(|e| format!("Failed to set clipboard text: {}", e))?;

                // Copy to PRIMARY selection (middle-click/Shift+Insert)
                let _ = clipboard
                    .set()
                    .clipboard(LinuxClipboardKind::Primary)
                    .text(text.to_string());
            }

            #[cfg(not(target_os = "linux"))]
            clipboard
                .set_text(text)
                .map_err(|e| format!("Failed to set clipboard text: {}", e))?;
        }

        Ok(())
    }

    /// Paste text from the clipboard.
    ///
    /// Tries the system clipboard first (on Linux CLIPBOARD, then PRIMARY),
    /// then the in-process copy. Returns None if both are empty.
    pub fn paste(&mut self) -> Option<String> {
        if let Some(text) = self.system.as_mut().and_then(system_text) {
            if !text.is_empty() {
                return Some(text);
            }
        }
        self.local.clone()
    }

    /// Cut text to clipboard.
    ///
    /// Same as copy - actual deletion is handled by the caller.
    pub fn cut(&mut self, text: &str) -> Result<(), String> {
        self.copy(text)
    }

    /// Check if clipboard contains text.
    pub fn has_text(&mut self) -> bool {
        self.paste().map(|t| !t.is_empty()).unwrap_or(false)
    }
}

#[cfg(target_os = "linux")]
fn system_text(clipboard: &mut arboard::Clipboard) -> Option<String> {
    // Try CLIPBOARD selection first
    if let Ok(text) = clipboard
        .get()
        .clipboard(LinuxClipboardKind::Clipboard)
        .text()
    {
        if !text.is_empty() {
            return Some(text);
        }
    }

    // Fall back to PRIMARY selection
    clipboard
        .get()
        .clipboard(LinuxClipboardKind::Primary)
        .text()
        .ok()
}

#[cfg(not(target_os = "linux"))]
fn system_text(clipboard: &mut arboard::Clipboard) -> Option<String> {
    clipboard.get_text().ok()
}
