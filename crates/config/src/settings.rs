//! Configuration structures for tabpad settings.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Editor settings. These are the defaults of every new tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Show the line-number gutter
    #[serde(default = "default_show_line_numbers")]
    pub show_line_numbers: bool,

    /// Enable word wrap in editor
    #[serde(default = "default_word_wrap")]
    pub word_wrap: bool,

    /// Lines scrolled per mouse wheel notch
    #[serde(default = "default_wheel_scroll_lines")]
    pub wheel_scroll_lines: usize,

    /// Extension (without dot) appended when saving a file named without one
    #[serde(default = "default_extension")]
    pub default_extension: String,

    /// Undo steps kept per tab
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the cache directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Messages kept in memory for the status view
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

// Default value functions for serde
fn default_show_line_numbers() -> bool {
    defaults::SHOW_LINE_NUMBERS
}

fn default_word_wrap() -> bool {
    defaults::WORD_WRAP
}

fn default_wheel_scroll_lines() -> usize {
    defaults::WHEEL_SCROLL_LINES
}

fn default_extension() -> String {
    defaults::DEFAULT_EXTENSION.to_string()
}

fn default_history_size() -> usize {
    defaults::HISTORY_SIZE
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

// Default implementations
impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            show_line_numbers: default_show_line_numbers(),
            word_wrap: default_word_wrap(),
            wheel_scroll_lines: default_wheel_scroll_lines(),
            default_extension: default_extension(),
            history_size: default_history_size(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}
