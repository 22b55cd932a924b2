//! Key bindings for the searchable dropdown.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key binding that maps one or more key combinations to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The set of key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A single key press with optional modifier keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    /// The base key code.
    pub code: KeyCode,
    /// Modifiers that must be held alongside the base key.
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// Bind several key combinations to one action.
    pub fn new(keys: Vec<KeyCombination>) -> Self {
        Self {
            keys,
            enabled: true,
        }
    }

    /// Whether `event` triggers this binding. The event may carry extra
    /// modifiers beyond the ones the combination requires.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && event.modifiers.contains(k.modifiers))
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

/// Keys the dropdown reacts to. Anything not bound here is treated as
/// search-field editing while the panel is open.
#[derive(Debug, Clone)]
pub struct DropdownKeyMap {
    /// Highlight the previous option.
    pub move_up: Binding,
    /// Highlight the next option.
    pub move_down: Binding,
    /// Commit the highlighted option.
    pub commit: Binding,
    /// Close without committing.
    pub cancel: Binding,
    /// Open the panel while it is closed.
    pub open: Binding,
}

impl Default for DropdownKeyMap {
    fn default() -> Self {
        Self {
            move_up: Binding::new(vec![
                KeyCombination::new(KeyCode::Up),
                KeyCombination::ctrl(KeyCode::Char('p')),
            ]),
            move_down: Binding::new(vec![
                KeyCombination::new(KeyCode::Down),
                KeyCombination::ctrl(KeyCode::Char('n')),
            ]),
            commit: Binding::new(vec![KeyCombination::new(KeyCode::Enter)]),
            cancel: Binding::new(vec![KeyCombination::new(KeyCode::Esc)]),
            open: Binding::new(vec![
                KeyCombination::new(KeyCode::Enter),
                KeyCombination::new(KeyCode::Down),
                KeyCombination::new(KeyCode::Char(' ')),
            ]),
        }
    }
}
