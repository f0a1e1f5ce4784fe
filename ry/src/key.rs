//! Keystrokes, as typed and as written in bindings.
//!
//! A keystroke is written as `(C-|S-|A-|M-)* NAME`, for example `C-w`, `G`,
//! `RET` or `$alpha`. Input keystrokes always carry a concrete key; the
//! wildcard codes only appear in binding patterns.

use std::{fmt, ops::BitOr, str::FromStr};
use tracing::trace;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    pub fn is_empty(&self) -> bool {
        *self == Modifiers::NONE
    }

    /// Whether a modifier other than Shift is held.
    pub fn has_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl || rhs.ctrl,
            shift: self.shift || rhs.shift,
            alt: self.alt || rhs.alt,
            meta: self.meta || rhs.meta,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char,
    Enter,
    Backspace,
    Delete,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// Pattern only: any key at all.
    Any,
    /// Pattern only: an ASCII letter.
    Alpha,
    /// Pattern only: an ASCII digit.
    Num,
    /// Pattern only: an ASCII letter or digit.
    AlphaNum,
}

impl KeyCode {
    /// Whether this code only appears in patterns.
    pub fn is_wildcard(self) -> bool {
        matches!(
            self,
            KeyCode::Any | KeyCode::Alpha | KeyCode::Num | KeyCode::AlphaNum
        )
    }
}

const NAMED: &[(&str, KeyCode)] = &[
    ("RET", KeyCode::Enter),
    ("BAK", KeyCode::Backspace),
    ("DEL", KeyCode::Delete),
    ("ESC", KeyCode::Escape),
    ("TAB", KeyCode::Tab),
    ("LEFT", KeyCode::Left),
    ("RIGHT", KeyCode::Right),
    ("UP", KeyCode::Up),
    ("DOWN", KeyCode::Down),
    ("HOME", KeyCode::Home),
    ("END", KeyCode::End),
    ("PGUP", KeyCode::PageUp),
    ("PGDN", KeyCode::PageDown),
];

const WILDCARDS: &[(&str, KeyCode)] = &[
    ("$any", KeyCode::Any),
    ("$alpha", KeyCode::Alpha),
    ("$num", KeyCode::Num),
    ("$alphanum", KeyCode::AlphaNum),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("Empty key pattern")]
    Empty,
    #[error("Empty key in pattern '{0}'")]
    EmptyToken(String),
    #[error("Unknown modifier '{modifier}' in '{token}'")]
    UnknownModifier { token: String, modifier: char },
    #[error("Unknown key '{0}'")]
    UnknownKey(String),
    #[error("Wildcard '{0}' can't take modifiers")]
    ModifiedWildcard(String),
    #[error("Wildcard '{0}' must be the last key of a pattern")]
    WildcardNotLast(String),
}

/// One key press, or one position of a binding pattern.
///
/// `rune` is set exactly when `code` is [`KeyCode::Char`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub modifiers: Modifiers,
    pub code: KeyCode,
    pub rune: Option<char>,
}

impl KeyStroke {
    pub fn char(rune: char) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            code: KeyCode::Char,
            rune: Some(rune),
        }
        .normalized()
    }

    pub fn code(code: KeyCode) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            code,
            rune: None,
        }
    }

    pub fn enter() -> Self {
        Self::code(KeyCode::Enter)
    }

    pub fn esc() -> Self {
        Self::code(KeyCode::Escape)
    }

    pub fn tab() -> Self {
        Self::code(KeyCode::Tab)
    }

    pub fn backspace() -> Self {
        Self::code(KeyCode::Backspace)
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self.normalized()
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self.normalized()
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.code.is_wildcard()
    }

    /// The rune of an unmodified character key.
    pub fn plain_rune(&self) -> Option<char> {
        match self.rune {
            Some(rune) if !self.modifiers.has_command() => Some(rune),
            _ => None,
        }
    }

    /// Shift is folded into the rune of character keys, and Ctrl letters are
    /// kept lowercase, so `S-x` is `X` and `C-W` is `C-w`.
    fn normalized(mut self) -> Self {
        if let Some(rune) = self.rune {
            let mut rune = rune;
            if self.modifiers.shift {
                rune = rune.to_ascii_uppercase();
                self.modifiers.shift = false;
            }
            if self.modifiers.ctrl {
                rune = rune.to_ascii_lowercase();
            }
            self.rune = Some(rune);
        }
        self
    }

    /// Whether `input` satisfies this pattern stroke.
    pub fn matches(&self, input: &KeyStroke) -> bool {
        let rune_in = |predicate: fn(&char) -> bool| {
            input.code == KeyCode::Char
                && !input.modifiers.has_command()
                && input.rune.as_ref().is_some_and(predicate)
        };
        match self.code {
            KeyCode::Any => true,
            KeyCode::Alpha => rune_in(char::is_ascii_alphabetic),
            KeyCode::Num => rune_in(char::is_ascii_digit),
            KeyCode::AlphaNum => rune_in(char::is_ascii_alphanumeric),
            _ => self == input,
        }
    }

    /// Builds the keystroke for a raw key event, folding the terminal quirks
    /// for control characters, backspace and escape.
    ///
    /// Returns `None` for wildcard codes or a character key without a rune.
    pub fn from_raw(raw: RawKey) -> Option<KeyStroke> {
        if raw.code.is_wildcard() {
            return None;
        }
        let mut modifiers = raw.modifiers;
        let stroke = match (raw.code, raw.rune) {
            (KeyCode::Char, Some(rune)) => match rune {
                '\r' | '\n' => KeyStroke::code(KeyCode::Enter),
                '\t' => KeyStroke::code(KeyCode::Tab),
                '\u{1b}' => KeyStroke::code(KeyCode::Escape),
                '\u{7f}' => KeyStroke::code(KeyCode::Backspace),
                '\u{1}'..='\u{1a}' => {
                    modifiers.ctrl = true;
                    KeyStroke::char((b'a' + (rune as u8 - 1)) as char)
                },
                rune => {
                    modifiers.shift = false;
                    KeyStroke::char(rune)
                },
            },
            (KeyCode::Char, None) => return None,
            (code, _) => KeyStroke::code(code),
        };
        let stroke = KeyStroke {
            modifiers: stroke.modifiers | modifiers,
            ..stroke
        }
        .normalized();
        trace!(?raw, key = %stroke, "translated key");
        Some(stroke)
    }
}

impl FromStr for KeyStroke {
    type Err = KeyParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() {
            return Err(KeyParseError::EmptyToken(token.to_string()));
        }
        let mut modifiers = Modifiers::NONE;
        let mut rest = token;
        loop {
            let mut chars = rest.chars();
            let (Some(prefix), Some('-'), Some(_)) = (chars.next(), chars.next(), chars.next())
            else {
                break;
            };
            match prefix {
                'C' => modifiers.ctrl = true,
                'S' => modifiers.shift = true,
                'A' => modifiers.alt = true,
                'M' => modifiers.meta = true,
                modifier => {
                    return Err(KeyParseError::UnknownModifier {
                        token: token.to_string(),
                        modifier,
                    })
                },
            }
            rest = &rest[2..];
        }

        if let Some((_, code)) = WILDCARDS.iter().find(|(name, _)| *name == rest) {
            if !modifiers.is_empty() {
                return Err(KeyParseError::ModifiedWildcard(token.to_string()));
            }
            return Ok(KeyStroke::code(*code));
        }

        let mut chars = rest.chars();
        let stroke = match (chars.next(), chars.next()) {
            (Some(rune), None) => KeyStroke {
                modifiers,
                code: KeyCode::Char,
                rune: Some(rune),
            },
            _ if rest == "SPC" => KeyStroke {
                modifiers,
                code: KeyCode::Char,
                rune: Some(' '),
            },
            _ => {
                let code = NAMED
                    .iter()
                    .find(|(name, _)| *name == rest)
                    .map(|(_, code)| *code)
                    .or_else(|| function_key(rest))
                    .ok_or_else(|| KeyParseError::UnknownKey(rest.to_string()))?;
                KeyStroke {
                    modifiers,
                    code,
                    rune: None,
                }
            },
        };
        Ok(stroke.normalized())
    }
}

fn function_key(name: &str) -> Option<KeyCode> {
    let number: u8 = name.strip_prefix('F')?.parse().ok()?;
    (1..=12).contains(&number).then_some(KeyCode::F(number))
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("C-")?;
        }
        if self.modifiers.alt {
            f.write_str("A-")?;
        }
        if self.modifiers.meta {
            f.write_str("M-")?;
        }
        if self.modifiers.shift {
            f.write_str("S-")?;
        }
        match (self.code, self.rune) {
            (KeyCode::Char, Some(' ')) => f.write_str("SPC"),
            (KeyCode::Char, Some(rune)) => write!(f, "{rune}"),
            (KeyCode::F(number), _) => write!(f, "F{number}"),
            (code, _) => {
                let name = NAMED
                    .iter()
                    .chain(WILDCARDS)
                    .find(|(_, named)| *named == code)
                    .map(|(name, _)| *name)
                    .unwrap_or("?");
                f.write_str(name)
            },
        }
    }
}

/// A key event as reported by the terminal, before translation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RawKey {
    pub modifiers: Modifiers,
    pub code: KeyCode,
    pub rune: Option<char>,
}

impl RawKey {
    pub fn rune(rune: char) -> Self {
        Self {
            modifiers: Modifiers::NONE,
            code: KeyCode::Char,
            rune: Some(rune),
        }
    }
}

#[cfg(feature = "crossterm")]
mod terminal {
    use super::{KeyCode, KeyStroke, Modifiers, RawKey};
    use crossterm::event::{self, KeyEvent, KeyEventKind, KeyModifiers};

    impl KeyStroke {
        /// Translates a crossterm key press. Releases and keys without a
        /// keystroke equivalent give `None`.
        pub fn from_crossterm(event: &KeyEvent) -> Option<KeyStroke> {
            if event.kind == KeyEventKind::Release {
                return None;
            }
            let mut modifiers = Modifiers {
                ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
                shift: event.modifiers.contains(KeyModifiers::SHIFT),
                alt: event.modifiers.contains(KeyModifiers::ALT),
                meta: event.modifiers.contains(KeyModifiers::META)
                    || event.modifiers.contains(KeyModifiers::SUPER),
            };
            let (code, rune) = match event.code {
                event::KeyCode::Char(rune) => (KeyCode::Char, Some(rune)),
                event::KeyCode::Enter => (KeyCode::Enter, None),
                event::KeyCode::Backspace => (KeyCode::Backspace, None),
                event::KeyCode::Delete => (KeyCode::Delete, None),
                event::KeyCode::Esc => (KeyCode::Escape, None),
                event::KeyCode::Tab => (KeyCode::Tab, None),
                event::KeyCode::BackTab => {
                    modifiers.shift = true;
                    (KeyCode::Tab, None)
                },
                event::KeyCode::Left => (KeyCode::Left, None),
                event::KeyCode::Right => (KeyCode::Right, None),
                event::KeyCode::Up => (KeyCode::Up, None),
                event::KeyCode::Down => (KeyCode::Down, None),
                event::KeyCode::Home => (KeyCode::Home, None),
                event::KeyCode::End => (KeyCode::End, None),
                event::KeyCode::PageUp => (KeyCode::PageUp, None),
                event::KeyCode::PageDown => (KeyCode::PageDown, None),
                event::KeyCode::F(number) => (KeyCode::F(number), None),
                _ => return None,
            };
            KeyStroke::from_raw(RawKey {
                modifiers,
                code,
                rune,
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ctrl_letter() {
            let event = KeyEvent::new(event::KeyCode::Char('w'), KeyModifiers::CONTROL);
            let key = KeyStroke::from_crossterm(&event);
            assert_eq!(key, Some(KeyStroke::char('w').ctrl()));
        }

        #[test]
        fn shifted_rune_drops_shift() {
            let event = KeyEvent::new(event::KeyCode::Char('G'), KeyModifiers::SHIFT);
            assert_eq!(KeyStroke::from_crossterm(&event), Some(KeyStroke::char('G')));
        }

        #[test]
        fn unsupported_key() {
            let event = KeyEvent::new(event::KeyCode::CapsLock, KeyModifiers::NONE);
            assert_eq!(KeyStroke::from_crossterm(&event), None);
        }
    }
}
