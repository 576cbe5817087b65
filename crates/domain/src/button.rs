//! User button state as reported by `sensors/button` notifications.

use std::fmt;

/// Discrete state carried by a button notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    /// Decode a notification body.
    ///
    /// Only the exact body `"0"` means released; anything else, including
    /// an empty body, counts as pressed.
    #[must_use]
    pub fn from_payload(body: &[u8]) -> Self {
        if body == b"0" {
            Self::Released
        } else {
            Self::Pressed
        }
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressed => f.write_str("pressed"),
            Self::Released => f.write_str("released"),
        }
    }
}
