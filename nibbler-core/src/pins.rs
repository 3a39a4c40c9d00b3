//! Logical pin interface of the core

use crate::mux::OutCtrl;
use std::fmt;

/// Value of the MODE input
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// MODE = 0: SPI writes/reads memory, engine held in IDLE
    #[default]
    Programming,
    /// MODE = 1: engine steps on RUN pulses, SPI frames ignored
    Execution,
}

impl Mode {
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Mode::Execution
        } else {
            Mode::Programming
        }
    }

    pub const fn bit(self) -> bool {
        matches!(self, Mode::Execution)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Programming => f.write_str("programming"),
            Mode::Execution => f.write_str("execution"),
        }
    }
}

/// Input pin levels for one clock
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Inputs {
    /// Global reset, active low
    pub rst_n: bool,
    pub mode: Mode,
    /// Execution step request
    pub run: bool,
    /// Debug multiplexer selector
    pub out_ctrl: OutCtrl,
    pub spi_sck: bool,
    pub spi_mosi: bool,
    /// Chip select, active low
    pub spi_cs_n: bool,
}

impl Default for Inputs {
    /// Reset released, programming mode, SPI bus idle (all lines high)
    fn default() -> Self {
        Self {
            rst_n: true,
            mode: Mode::Programming,
            run: false,
            out_ctrl: OutCtrl::default(),
            spi_sck: true,
            spi_mosi: true,
            spi_cs_n: true,
        }
    }
}

/// Output pin levels
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Outputs {
    /// 8-bit debug field
    pub wide: u8,
    /// 3-bit debug field
    pub narrow: u8,
    /// 4-bit engine state: 0b0000 IDLE, 0b0001 RUNNING
    pub state: u8,
    pub spi_miso: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bits() {
        assert_eq!(Mode::from_bit(false), Mode::Programming);
        assert_eq!(Mode::from_bit(true), Mode::Execution);
        assert!(Mode::Execution.bit());
    }

    #[test]
    fn test_default_inputs_idle_bus() {
        let inputs = Inputs::default();
        assert!(inputs.rst_n);
        assert!(inputs.spi_cs_n);
        assert!(inputs.spi_sck);
        assert!(!inputs.run);
        assert_eq!(inputs.mode, Mode::Programming);
    }
}
