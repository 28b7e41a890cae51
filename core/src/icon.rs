use core::fmt;
use serde::{Deserialize, Serialize};

/// Glyphs used for compact board dumps.
const SYMBOLS: &[u8; 10] = b"!@+#$%*.&=";

/// A jewel kind. Two icons are the same jewel iff their types match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Icon(u8);

impl Icon {
    pub const fn new(kind: u8) -> Self {
        Self(kind)
    }

    pub const fn kind(self) -> u8 {
        self.0
    }

    /// Glyph for this icon on a board with `icon_types` kinds, wrapping at
    /// whichever is smaller of that count and the glyph table.
    pub const fn symbol(self, icon_types: u8) -> char {
        let mut glyphs = icon_types as usize;
        if glyphs == 0 || glyphs > SYMBOLS.len() {
            glyphs = SYMBOLS.len();
        }
        SYMBOLS[self.0 as usize % glyphs] as char
    }
}

impl From<u8> for Icon {
    fn from(kind: u8) -> Self {
        Self(kind)
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
