//! # Nibbler Core Definitions
//!
//! Shared vocabulary for the Nibbler core: a tiny CPU with a nibble-wide
//! code store and data store, programmed over a bit-serial SPI bus and
//! single-stepped through a RUN/STATE handshake.
//!
//! ## Key Features
//! - 11-bit address space of 4-bit cells (2048 nibbles)
//! - Code region below [`DATA_REGION_BASE`], data region above it
//! - 16-bit SPI frames: `[rw:1][address:11][data:4]`
//! - 3-bit opcodes (`NOP = 0x0`, `STOP = 0x7`, the rest reserved)
//! - Binary memory images for loading programs

pub mod address;
pub mod nibble;
pub mod opcode;
pub mod frame;
pub mod config;
pub mod image;
pub mod error;

pub use address::{Address, Region};
pub use nibble::Nibble;
pub use opcode::Opcode;
pub use frame::{Direction, SpiFrame};
pub use config::{Config, ConfigError, MemoryResetPolicy};
pub use image::{ImageHeader, MemoryImage};
pub use error::NibblerError;

/// Address width in bits
pub const ADDRESS_BITS: u32 = 11;

/// Number of addressable cells
pub const ADDRESS_SPACE: usize = 1 << ADDRESS_BITS;

/// Mask selecting the 11 address bits
pub const ADDRESS_MASK: u16 = (1 << ADDRESS_BITS) - 1;

/// First address of the data region; everything below is code.
///
/// This is the only place the code/data boundary is defined.
pub const DATA_REGION_BASE: u16 = 0x400;

/// Size of the window of each region the CPU can reach with an 8-bit pointer
pub const WINDOW_SIZE: usize = 0x100;

/// Base of the CPU code window (instruction pointer 0)
pub const CODE_BASE: u16 = 0x000;

/// Base of the CPU data window (data pointer 0)
pub const DATA_BASE: u16 = DATA_REGION_BASE;

/// Cell width in bits
pub const NIBBLE_BITS: u32 = 4;
