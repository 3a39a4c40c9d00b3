//! # Opcode Definitions
//!
//! An opcode is the low 3 bits of a code cell. Bit 3 of the cell is not
//! decoded; the memory bank keeps it so programs round-trip unchanged.
//!
//! ## Opcode Map
//! - 0x0: NOP  - no effect, advance
//! - 0x1-0x6: reserved, stepped as NOP
//! - 0x7: STOP - tells the controller to stop issuing RUN pulses

use crate::nibble::Nibble;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mask selecting the opcode bits of a cell
pub const OPCODE_MASK: u8 = 0x7;

/// Decoded 3-bit opcode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// NOP: no effect
    Nop,
    /// Reserved encodings 0x1-0x6, kept verbatim
    Reserved(u8),
    /// STOP: end of program
    Stop,
}

impl Opcode {
    pub const NOP_BITS: u8 = 0x0;
    pub const STOP_BITS: u8 = 0x7;

    /// Decode the low 3 bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & OPCODE_MASK {
            Self::NOP_BITS => Opcode::Nop,
            Self::STOP_BITS => Opcode::Stop,
            other => Opcode::Reserved(other),
        }
    }

    /// Decode a fetched code cell
    #[inline]
    pub const fn from_cell(cell: Nibble) -> Self {
        Self::from_bits(cell.value())
    }

    pub const fn to_bits(self) -> u8 {
        match self {
            Opcode::Nop => Self::NOP_BITS,
            Opcode::Stop => Self::STOP_BITS,
            Opcode::Reserved(bits) => bits & OPCODE_MASK,
        }
    }

    /// Code cell encoding this opcode (bit 3 clear)
    #[inline]
    pub const fn to_cell(self) -> Nibble {
        Nibble::truncate(self.to_bits())
    }

    #[inline]
    pub const fn is_stop(self) -> bool {
        matches!(self, Opcode::Stop)
    }

    #[inline]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Opcode::Reserved(_))
    }

    pub fn mnemonic(self) -> String {
        match self {
            Opcode::Nop => "nop".to_string(),
            Opcode::Stop => "stop".to_string(),
            Opcode::Reserved(bits) => format!("op {}", bits),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.mnemonic())
    }
}
