//! LED actuators on the OpenMote board.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three user LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Led {
    Red,
    Green,
    Blue,
}

impl Led {
    /// Every LED, in board order.
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    /// Query string selecting this LED on `actuators/leds`.
    #[must_use]
    pub fn color_query(self) -> &'static str {
        match self {
            Self::Red => "color=r",
            Self::Green => "color=g",
            Self::Blue => "color=b",
        }
    }

    /// Position of this LED in [`Led::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl fmt::Display for Led {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
            Self::Blue => f.write_str("blue"),
        }
    }
}
