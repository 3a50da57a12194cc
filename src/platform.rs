//! Platform-specific key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Extra modifier accepted for form commands
/// - macOS: SUPER (Cmd key), alongside Ctrl
/// - Linux/Windows: none beyond Ctrl
#[cfg(target_os = "macos")]
const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
const COMMAND_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// True when `key` is the form command `ch` (Ctrl+`ch`, or Cmd+`ch` on macOS)
pub fn is_command(key: &KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch)
        && (key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(COMMAND_MODIFIER))
}

#[cfg(target_os = "macos")]
mod labels {
    pub const SAVE_SHORTCUT: &str = "Cmd+S";
    pub const NEXT_SHORTCUT: &str = "Cmd+N";
    pub const PREV_SHORTCUT: &str = "Cmd+P";
    pub const ADD_ENTRY_SHORTCUT: &str = "Cmd+A";
    pub const REMOVE_ENTRY_SHORTCUT: &str = "Cmd+X";
}

#[cfg(not(target_os = "macos"))]
mod labels {
    pub const SAVE_SHORTCUT: &str = "Ctrl+S";
    pub const NEXT_SHORTCUT: &str = "Ctrl+N";
    pub const PREV_SHORTCUT: &str = "Ctrl+P";
    pub const ADD_ENTRY_SHORTCUT: &str = "Ctrl+A";
    pub const REMOVE_ENTRY_SHORTCUT: &str = "Ctrl+X";
}

pub use labels::*;
