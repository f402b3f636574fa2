//! Key bindings for interactive pause control.
//!
//! Only consulted when the countdown was built with pause allowed; a
//! non-pausable countdown ignores key messages entirely.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A named key binding with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyCode>,
    help_key: String,
    help_desc: String,
}

impl Binding {
    /// Creates a binding matching any of the given key codes.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help_key: String::new(),
            help_desc: String::new(),
        }
    }

    /// Attaches help text (`key`, `description`) shown by hosts.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help_key = key.into();
        self.help_desc = desc.into();
        self
    }

    /// Whether a key message matches this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys.contains(&msg.key)
    }

    /// Help text pair for display: `(key, description)`.
    pub fn help(&self) -> (&str, &str) {
        (&self.help_key, &self.help_desc)
    }
}

/// Key map for the countdown widget.
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Alternates pause and resume on each press.
    pub toggle: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('p')])
                .with_help("space/p", "pause or resume"),
        }
    }
}
