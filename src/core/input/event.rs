//=========================================================================
// Keyboard Event Types
//
// Closed vocabulary of keys the engine reports to listeners, plus the
// pure mapping from logical platform keys into it.
//
// Responsibilities:
// - Name the handful of keys games built on this engine react to
// - Collapse every other key into `Unknown` instead of failing
//
// Mapping:
// ```text
//   winit Key (logical)      →  KeyboardEvent
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::keyboard::{Key, NamedKey};

//=== KeyboardEvent =======================================================

/// Key identity delivered to [`KeyboardListener`](super::KeyboardListener)s.
///
/// Only arrows, the digit row, `*` and `-` are mapped. Listeners must
/// handle `Unknown` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardEvent {
    //--- Arrow Keys -------------------------------------------------------
    Left,
    Right,
    Up,
    Down,

    //--- Digits -----------------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Punctuation ------------------------------------------------------
    Asterisk,
    Minus,

    //--- Fallback ---------------------------------------------------------
    /// Any key outside the mapped set.
    Unknown,
}

impl KeyboardEvent {
    const DIGITS: [KeyboardEvent; 10] = [
        Self::Digit0, Self::Digit1, Self::Digit2, Self::Digit3, Self::Digit4,
        Self::Digit5, Self::Digit6, Self::Digit7, Self::Digit8, Self::Digit9,
    ];

    /// Event for digit `n` (0-9).
    pub fn from_digit(n: u32) -> Option<Self> {
        Self::DIGITS.get(n as usize).copied()
    }

    /// Numeric value of a digit event.
    pub fn digit(self) -> Option<u8> {
        Self::DIGITS
            .iter()
            .position(|&d| d == self)
            .map(|n| n as u8)
    }

    pub fn is_arrow(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Up | Self::Down)
    }

    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }

    /// Maps a single typed character.
    fn from_char(c: char) -> Self {
        match c {
            '*' => Self::Asterisk,
            '-' => Self::Minus,
            _ => c
                .to_digit(10)
                .and_then(Self::from_digit)
                .unwrap_or(Self::Unknown),
        }
    }
}

//=== Logical Key Conversion ==============================================
//
// Logical keys carry the symbol produced, so "*" arrives as
// `Character("*")` regardless of which physical key typed it.
//

impl From<&Key> for KeyboardEvent {
    fn from(key: &Key) -> Self {
        match key {
            Key::Named(NamedKey::ArrowLeft) => Self::Left,
            Key::Named(NamedKey::ArrowRight) => Self::Right,
            Key::Named(NamedKey::ArrowUp) => Self::Up,
            Key::Named(NamedKey::ArrowDown) => Self::Down,
            Key::Character(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => Self::Unknown,
                }
            }
            _ => Self::Unknown,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
