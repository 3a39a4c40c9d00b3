//! # Error Types for the Nibbler definitions crate

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NibblerError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Value range errors
    #[error("Invalid nibble: {0:#04x} (valid range: 0x0-0xf)")]
    InvalidNibble(u8),

    #[error("Invalid address: {0:#06x} (valid range: 0x000-0x7ff)")]
    InvalidAddress(u16),

    // Image format errors
    #[error("Invalid image magic: expected 0x4e494242, got {0:#010x}")]
    InvalidMagic(u32),

    #[error("Invalid image version: expected {expected:#010x}, found {found:#010x}")]
    InvalidVersion { expected: u32, found: u32 },

    #[error("Section {section} holds {found} cells, window holds {max}")]
    SectionTooLarge {
        section: &'static str,
        found: usize,
        max: usize,
    },

    #[error("Section {section} length mismatch: header says {expected}, found {found}")]
    SectionLengthMismatch {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}
