//! # Core Configuration
//!
//! Implementation choices the pin-level contract leaves open, gathered in
//! one place so tests can exercise each of them explicitly.

use crate::nibble::Nibble;
use std::fmt;

/// What a global reset does to the memory bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryResetPolicy {
    /// Every cell is overwritten with `Config::fill`
    #[default]
    Clear,
    /// Cells keep their contents across reset
    Retain,
}

impl fmt::Display for MemoryResetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryResetPolicy::Clear => f.write_str("clear"),
            MemoryResetPolicy::Retain => f.write_str("retain"),
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Config {
    /// Memory behavior on global reset
    pub memory_reset: MemoryResetPolicy,
    /// Value of every cell after power-up and after a clearing reset
    pub fill: Nibble,
    /// Record `CoreEvent`s for the caller to drain
    pub record_events: bool,
}

impl Config {
    /// Default configuration:
    /// - memory cleared on reset
    /// - cleared cells read as NOP (0x0)
    /// - no event recording
    pub const DEFAULT: Self = Self {
        memory_reset: MemoryResetPolicy::Clear,
        fill: Nibble::ZERO,
        record_events: false,
    };

    /// Create a configuration from a raw fill value
    pub fn new(memory_reset: MemoryResetPolicy, fill: u8, record_events: bool) -> Result<Self, ConfigError> {
        let fill = Nibble::new(fill).map_err(|_| ConfigError::InvalidFill(fill))?;
        Ok(Self {
            memory_reset,
            fill,
            record_events,
        })
    }

    pub fn with_memory_reset(mut self, policy: MemoryResetPolicy) -> Self {
        self.memory_reset = policy;
        self
    }

    pub fn with_fill(mut self, fill: Nibble) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    /// Whether reset overwrites memory
    #[inline]
    pub const fn clears_memory(&self) -> bool {
        matches!(self.memory_reset, MemoryResetPolicy::Clear)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ memory_reset: {}, fill: {:#x}, events: {} }}",
            self.memory_reset, self.fill, self.record_events,
        )
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Fill value {0:#x} does not fit in a nibble")]
    InvalidFill(u8),

    #[error("Unknown memory reset policy: expected `clear` or `retain`")]
    UnknownResetPolicy,
}

impl std::str::FromStr for MemoryResetPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clear" => Ok(MemoryResetPolicy::Clear),
            "retain" => Ok(MemoryResetPolicy::Retain),
            _ => Err(ConfigError::UnknownResetPolicy),
        }
    }
}
