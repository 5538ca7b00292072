//! L4 Atomic Layer: Key bindings
//!
//! Vim-style notation from the config, e.g. `j`, `G`, `<C-f>`, `<CR>`,
//! `<S-Tab>`, `<BS>`.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use marquee_core::KeymapConfig;
use tracing::warn;

/// Everything a key can ask of the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    PageDown,
    PageUp,
    NextLetter,
    PrevLetter,
    Random,
    Select,
    MenuBack,
    NextPlaylist,
    PrevPlaylist,
    AddFavorite,
    RemoveFavorite,
    Quit,
}

impl Action {
    /// Held down to scroll continuously
    pub fn is_scroll(&self) -> bool {
        matches!(self, Action::Forward | Action::Back)
    }
}

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Terminals report Shift+Tab as BackTab, with or without the modifier
    fn from_event(event: &KeyEvent) -> Self {
        match event.code {
            KeyCode::BackTab => Self::shift(KeyCode::Tab),
            code => Self::new(code, event.modifiers),
        }
    }
}

/// Runtime keymap for key-to-action lookup
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();

        let mut add_binding = |key_str: &str, action: Action| match parse_key_binding(key_str) {
            Some(binding) => {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        key = key_str,
                        ?existing,
                        ignored = ?action,
                        "Key conflict, keeping the first binding"
                    );
                } else {
                    bindings.insert(binding, action);
                }
            }
            None => warn!(key = key_str, ?action, "Invalid key binding"),
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.forward, Action::Forward);
        add_binding(&config.back, Action::Back);
        add_binding(&config.page_down, Action::PageDown);
        add_binding(&config.page_up, Action::PageUp);
        add_binding(&config.letter_down, Action::NextLetter);
        add_binding(&config.letter_up, Action::PrevLetter);
        add_binding(&config.random, Action::Random);
        add_binding(&config.select, Action::Select);
        add_binding(&config.menu_back, Action::MenuBack);
        add_binding(&config.next_playlist, Action::NextPlaylist);
        add_binding(&config.prev_playlist, Action::PrevPlaylist);
        add_binding(&config.add_favorite, Action::AddFavorite);
        add_binding(&config.remove_favorite, Action::RemoveFavorite);

        // Fixed alternatives
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.entry(KeyBinding::simple(KeyCode::Down)).or_insert(Action::Forward);
        bindings.entry(KeyBinding::simple(KeyCode::Up)).or_insert(Action::Back);
        bindings.entry(KeyBinding::simple(KeyCode::PageDown)).or_insert(Action::PageDown);
        bindings.entry(KeyBinding::simple(KeyCode::PageUp)).or_insert(Action::PageUp);
        bindings.entry(KeyBinding::simple(KeyCode::Esc)).or_insert(Action::MenuBack);

        Self { bindings }
    }

    pub fn get(&self, binding: &KeyBinding) -> Option<Action> {
        self.bindings.get(binding).copied()
    }

    pub fn action(&self, event: &KeyEvent) -> Option<Action> {
        self.get(&KeyBinding::from_event(event))
    }
}

/// Parse Vim-style key notation into a binding
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if let Some(inner) = s.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        return parse_special_key(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        return Some(KeyBinding::shift(KeyCode::Char(c)));
    }
    Some(KeyBinding::simple(KeyCode::Char(c)))
}

fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        return parse_key_name(rest).map(KeyBinding::ctrl);
    }
    if let Some(rest) = inner.strip_prefix("S-") {
        return parse_key_name(rest).map(KeyBinding::shift);
    }
    parse_key_name(inner).map(KeyBinding::simple)
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "del" | "delete" => Some(KeyCode::Delete),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        other => {
            if let Some(n) = other.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=12).contains(&n).then_some(KeyCode::F(n));
            }
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c)),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_key_binding("j"), Some(KeyBinding::simple(KeyCode::Char('j'))));
        assert_eq!(parse_key_binding("G"), Some(KeyBinding::shift(KeyCode::Char('G'))));
        assert_eq!(parse_key_binding("<C-f>"), Some(KeyBinding::ctrl(KeyCode::Char('f'))));
        assert_eq!(parse_key_binding("<BS>"), Some(KeyBinding::simple(KeyCode::Backspace)));
        assert_eq!(parse_key_binding("<S-Tab>"), Some(KeyBinding::shift(KeyCode::Tab)));
        assert_eq!(parse_key_binding("<F5>"), Some(KeyBinding::simple(KeyCode::F(5))));
        assert_eq!(parse_key_binding("<F13>"), None);
        assert_eq!(parse_key_binding("jk"), None);
        assert_eq!(parse_key_binding("<Nope>"), None);
    }

    #[test]
    fn test_default_keymap() {
        let keymap = Keymap::default();
        assert_eq!(keymap.action(&press(KeyCode::Char('j'), KeyModifiers::NONE)), Some(Action::Forward));
        assert_eq!(keymap.action(&press(KeyCode::Down, KeyModifiers::NONE)), Some(Action::Forward));
        assert_eq!(keymap.action(&press(KeyCode::Char('f'), KeyModifiers::CONTROL)), Some(Action::PageDown));
        assert_eq!(keymap.action(&press(KeyCode::Enter, KeyModifiers::NONE)), Some(Action::Select));
        assert_eq!(keymap.action(&press(KeyCode::BackTab, KeyModifiers::SHIFT)), Some(Action::PrevPlaylist));
        assert_eq!(keymap.action(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Action::Quit));
        assert_eq!(keymap.action(&press(KeyCode::Char('f'), KeyModifiers::NONE)), Some(Action::AddFavorite));
        assert_eq!(keymap.action(&press(KeyCode::Char('F'), KeyModifiers::SHIFT)), Some(Action::RemoveFavorite));
        assert_eq!(keymap.action(&press(KeyCode::Char('z'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_conflicts_keep_first() {
        let config = KeymapConfig {
            random: "j".to_string(),
            ..KeymapConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.get(&KeyBinding::simple(KeyCode::Char('j'))), Some(Action::Forward));
    }
}
