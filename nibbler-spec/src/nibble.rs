//! Nibble cell type

use crate::error::NibblerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One 4-bit memory cell
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Nibble(u8);

impl Nibble {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(0xF);

    /// Create a nibble, rejecting values above 0xF
    pub fn new(value: u8) -> Result<Self, NibblerError> {
        if value > 0xF {
            return Err(NibblerError::InvalidNibble(value));
        }
        Ok(Self(value))
    }

    /// Create a nibble from the low 4 bits of `value`
    #[inline]
    pub const fn truncate(value: u8) -> Self {
        Self(value & 0xF)
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Low 3 bits, the part exposed on the narrow debug field
    #[inline]
    pub const fn low3(self) -> u8 {
        self.0 & 0x7
    }

    /// Bit `index` (0 = LSB)
    #[inline]
    pub const fn bit(self, index: u32) -> bool {
        (self.0 >> index) & 1 == 1
    }
}

impl TryFrom<u8> for Nibble {
    type Error = NibblerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Nibble> for u8 {
    fn from(nibble: Nibble) -> Self {
        nibble.0
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::LowerHex for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
