//! 11-bit addresses and the code/data region split

use crate::error::NibblerError;
use crate::{ADDRESS_MASK, CODE_BASE, DATA_BASE, DATA_REGION_BASE, WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory region an address falls into
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// Instruction cells, below `DATA_REGION_BASE`
    Code,
    /// Scalar data cells, from `DATA_REGION_BASE` up
    Data,
}

impl Region {
    /// First address of the region
    pub const fn base(self) -> u16 {
        match self {
            Region::Code => CODE_BASE,
            Region::Data => DATA_BASE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Region::Code => "code",
            Region::Data => "data",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 11-bit cell address (0x000-0x7FF)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Address(u16);

impl Address {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(ADDRESS_MASK);

    /// Create an address, rejecting values wider than 11 bits
    pub fn new(value: u16) -> Result<Self, NibblerError> {
        if value > ADDRESS_MASK {
            return Err(NibblerError::InvalidAddress(value));
        }
        Ok(Self(value))
    }

    /// Create an address from the low 11 bits of `value`
    #[inline]
    pub const fn truncate(value: u16) -> Self {
        Self(value & ADDRESS_MASK)
    }

    /// Address of code cell `offset` (what the instruction pointer reaches)
    #[inline]
    pub const fn code(offset: u8) -> Self {
        Self(CODE_BASE + offset as u16)
    }

    /// Address of data cell `offset` (what the data pointer reaches)
    #[inline]
    pub const fn data(offset: u8) -> Self {
        Self(DATA_BASE + offset as u16)
    }

    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn region(self) -> Region {
        if self.0 < DATA_REGION_BASE {
            Region::Code
        } else {
            Region::Data
        }
    }

    /// Offset from the base of the address's region
    #[inline]
    pub const fn offset(self) -> u16 {
        self.0 - self.region().base()
    }

    /// Low 8 bits, as shown on the wide debug field
    #[inline]
    pub const fn low_byte(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Whether the CPU can reach this cell with an 8-bit pointer
    #[inline]
    pub const fn in_window(self) -> bool {
        (self.offset() as usize) < WINDOW_SIZE
    }
}

impl TryFrom<u16> for Address {
    type Error = NibblerError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Address> for u16 {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03x}", self.0)
    }
}
