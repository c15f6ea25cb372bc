use dioxus::events::{Key, Modifiers};

/// The keys the router cares about. Anything else is `Other` and falls
/// through to native behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyCode {
    Char(String),
    Enter,
    Tab,
    Escape,
    F2,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// A framework-independent key event, so the router and its tests need no
/// browser or toolkit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(code: KeyCode) -> Self {
        KeyPress {
            code,
            shift: false,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn char(ch: &str) -> Self {
        Self::plain(KeyCode::Char(ch.to_string()))
    }

    pub fn shifted(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrled(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alted(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS; shortcuts accept either.
    pub fn ctrl_or_meta(&self) -> bool {
        self.ctrl || self.meta
    }

    /// A single printable character with no control-key chord: the trigger
    /// for Replace-mode editing.
    pub fn printable(&self) -> Option<&str> {
        if self.ctrl || self.meta {
            return None;
        }
        match &self.code {
            KeyCode::Char(s) if s.chars().count() == 1 => Some(s),
            _ => None,
        }
    }

    pub fn from_dioxus(key: &Key, modifiers: Modifiers) -> Self {
        let code = match key {
            Key::Character(s) => KeyCode::Char(s.to_string()),
            Key::Enter => KeyCode::Enter,
            Key::Tab => KeyCode::Tab,
            Key::Escape => KeyCode::Escape,
            Key::F2 => KeyCode::F2,
            Key::Backspace => KeyCode::Backspace,
            Key::Delete => KeyCode::Delete,
            Key::ArrowUp => KeyCode::ArrowUp,
            Key::ArrowDown => KeyCode::ArrowDown,
            Key::ArrowLeft => KeyCode::ArrowLeft,
            Key::ArrowRight => KeyCode::ArrowRight,
            _ => KeyCode::Other,
        };
        KeyPress {
            code,
            shift: modifiers.shift(),
            ctrl: modifiers.ctrl(),
            alt: modifiers.alt(),
            meta: modifiers.meta(),
        }
    }
}
