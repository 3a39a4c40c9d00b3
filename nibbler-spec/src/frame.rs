//! # SPI Frame Encoding
//!
//! A frame is one 16-bit word, shifted MSB first while chip select is
//! asserted.
//!
//! ```text
//! [15]      [14:4]        [3:0]
//! rw        address       data
//! 0=write   11 bits       nibble (ignored on read)
//! 1=read
//! ```

use crate::address::Address;
use crate::nibble::Nibble;
use crate::ADDRESS_MASK;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits in a frame
pub const FRAME_BITS: u8 = 16;

/// Position of the direction flag
pub const DIRECTION_SHIFT: u32 = 15;

/// Position of the address LSB
pub const ADDRESS_SHIFT: u32 = 4;

/// Mask of the data field
pub const DATA_MASK: u16 = 0xF;

/// Access direction carried in bit 15
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Write,
    Read,
}

impl Direction {
    #[inline]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Direction::Read
        } else {
            Direction::Write
        }
    }

    #[inline]
    pub const fn bit(self) -> bool {
        matches!(self, Direction::Read)
    }
}

/// Decoded SPI frame
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpiFrame {
    pub direction: Direction,
    pub address: Address,
    pub data: Nibble,
}

impl SpiFrame {
    pub const fn write(address: Address, data: Nibble) -> Self {
        Self {
            direction: Direction::Write,
            address,
            data,
        }
    }

    pub const fn read(address: Address) -> Self {
        Self {
            direction: Direction::Read,
            address,
            data: Nibble::ZERO,
        }
    }

    /// Pack into the 16-bit wire word
    pub const fn encode(&self) -> u16 {
        ((self.direction.bit() as u16) << DIRECTION_SHIFT)
            | (self.address.value() << ADDRESS_SHIFT)
            | self.data.value() as u16
    }

    /// Unpack a 16-bit wire word; every word is a valid frame
    pub const fn decode(word: u16) -> Self {
        Self {
            direction: Direction::from_bit((word >> DIRECTION_SHIFT) & 1 == 1),
            address: Address::truncate((word >> ADDRESS_SHIFT) & ADDRESS_MASK),
            data: Nibble::truncate((word & DATA_MASK) as u8),
        }
    }

    /// Wire bits in transmission order (MSB first)
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let word = self.encode();
        (0..FRAME_BITS as u32).rev().map(move |i| (word >> i) & 1 == 1)
    }

    #[inline]
    pub const fn is_write(&self) -> bool {
        matches!(self.direction, Direction::Write)
    }
}

impl fmt::Display for SpiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Write => write!(f, "write {} <- {:x}", self.address, self.data),
            Direction::Read => write!(f, "read {}", self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_stop_write_at_zero() {
        // The first frame a programmer sends to load STOP at 0x000
        let frame = SpiFrame::write(Address::code(0), Nibble::truncate(0x7));
        assert_eq!(frame.encode(), 0b0000_0000_0000_0111);
    }

    #[test]
    fn test_encode_nop_write_at_one() {
        let frame = SpiFrame::write(Address::code(1), Nibble::ZERO);
        assert_eq!(frame.encode(), 0b0000_0000_0001_0000);
    }

    #[test]
    fn test_read_flag_is_bit_15() {
        let frame = SpiFrame::read(Address::truncate(0x7FF));
        assert_eq!(frame.encode(), 0xFFF0);
        assert_eq!(SpiFrame::decode(0x8000).direction, Direction::Read);
        assert_eq!(SpiFrame::decode(0x7FFF).direction, Direction::Write);
    }

    #[test]
    fn test_decode_fields() {
        let frame = SpiFrame::decode(0b0100_0000_0011_1010);
        assert_eq!(frame.direction, Direction::Write);
        assert_eq!(frame.address.value(), 0x403);
        assert_eq!(frame.data.value(), 0xA);
    }

    #[test]
    fn test_bits_are_msb_first() {
        let frame = SpiFrame::decode(0x8001);
        let bits: Vec<bool> = frame.bits().collect();
        assert_eq!(bits.len(), 16);
        assert!(bits[0]);
        assert!(bits[15]);
        assert!(bits[1..15].iter().all(|b| !b));
    }

    #[test]
    fn test_display() {
        let frame = SpiFrame::write(Address::data(2), Nibble::truncate(0xB));
        assert_eq!(frame.to_string(), "write 0x402 <- b");
        assert_eq!(SpiFrame::read(Address::code(3)).to_string(), "read 0x003");
    }
}
