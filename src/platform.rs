//! Platform-specific keyboard configuration

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Modifier for form and wizard shortcuts.
/// Terminals deliver Cmd combinations inconsistently on macOS, so Ctrl is used everywhere.
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// True when `key` is the shortcut modifier plus `c`
pub fn is_shortcut(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(SHORTCUT_MODIFIER) && key.code == KeyCode::Char(c)
}

/// Submit shortcut display
/// - macOS: "⌃S"
/// - Linux/Windows: "Ctrl+S"
#[cfg(target_os = "macos")]
pub const SUBMIT_SHORTCUT: &str = "⌃S";

#[cfg(not(target_os = "macos"))]
pub const SUBMIT_SHORTCUT: &str = "Ctrl+S";

/// Cancel (discard draft) shortcut display
#[cfg(target_os = "macos")]
pub const CANCEL_SHORTCUT: &str = "⌃X";

#[cfg(not(target_os = "macos"))]
pub const CANCEL_SHORTCUT: &str = "Ctrl+X";

/// Wizard navigation shortcut display
#[cfg(target_os = "macos")]
pub const STEP_SHORTCUTS: &str = "⌃N/⌃P";

#[cfg(not(target_os = "macos"))]
pub const STEP_SHORTCUTS: &str = "Ctrl+N/Ctrl+P";

/// Finish onboarding shortcut display
#[cfg(target_os = "macos")]
pub const FINISH_SHORTCUT: &str = "⌃F";

#[cfg(not(target_os = "macos"))]
pub const FINISH_SHORTCUT: &str = "Ctrl+F";
