//! Keyboard input decoding.
//!
//! The shell forwards `KeyboardEvent.key` strings and a modifier bitmask;
//! this module turns them into something the controller can match on.

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    F2,
    /// A printable character
    Char(char),
    Other,
}

impl Key {
    /// Decode a DOM `KeyboardEvent.key` value.
    pub fn parse(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "Delete" | "Del" => Key::Delete,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            "F2" => Key::F2,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if !ch.is_control() => Key::Char(ch),
                    _ => Key::Other,
                }
            }
        }
    }

    /// Row/column step for arrow keys.
    pub fn arrow_delta(self) -> Option<(i64, i64)> {
        match self {
            Key::ArrowUp => Some((-1, 0)),
            Key::ArrowDown => Some((1, 0)),
            Key::ArrowLeft => Some((0, -1)),
            Key::ArrowRight => Some((0, 1)),
            _ => None,
        }
    }
}

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const SHIFT: u32 = 1;
    pub const CTRL: u32 = 2;
    pub const ALT: u32 = 4;
    pub const META: u32 = 8;

    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn from_bits(bits: u32) -> Self {
        Self {
            shift: bits & Self::SHIFT != 0,
            ctrl: bits & Self::CTRL != 0,
            alt: bits & Self::ALT != 0,
            meta: bits & Self::META != 0,
        }
    }

    pub fn bits(self) -> u32 {
        let mut bits = 0;
        for (held, bit) in [
            (self.shift, Self::SHIFT),
            (self.ctrl, Self::CTRL),
            (self.alt, Self::ALT),
            (self.meta, Self::META),
        ] {
            if held {
                bits |= bit;
            }
        }
        bits
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    pub fn shifted() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn with_command() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ArrowUp", Key::ArrowUp)]
    #[test_case("Esc", Key::Escape)]
    #[test_case("a", Key::Char('a'))]
    #[test_case(" ", Key::Char(' '))]
    #[test_case("é", Key::Char('é'))]
    #[test_case("Shift", Key::Other)]
    #[test_case("F12", Key::Other)]
    fn test_parse(name: &str, expected: Key) {
        assert_eq!(Key::parse(name), expected);
    }

    #[test]
    fn test_modifier_bits() {
        let mods = Modifiers::from_bits(Modifiers::SHIFT | Modifiers::META);
        assert!(mods.shift && mods.meta && !mods.ctrl && !mods.alt);
        assert!(mods.command());
        assert_eq!(mods.bits(), 9);
        assert_eq!(Modifiers::from_bits(0), Modifiers::NONE);
    }
}
