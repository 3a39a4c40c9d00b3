//! Debug output multiplexer
//!
//! Projects one of eight internal signal pairs onto the 8-bit and 3-bit
//! output fields. Purely combinational: the selector is read every time
//! and nothing is latched or modified.
//!
//! | sel | wide                  | narrow                         |
//! |-----|-----------------------|--------------------------------|
//! | 0   | SPI code port address | SPI code port data in          |
//! | 1   | SPI code port address | code cell at that address      |
//! | 2   | SPI data port address | SPI data port data in          |
//! | 3   | SPI data port address | data cell at that address      |
//! | 4   | IP                    | fetched opcode                 |
//! | 5   | IP                    | fetched opcode                 |
//! | 6   | DP                    | engine data write bus          |
//! | 7   | DP                    | data cell at DP                |

use crate::state::CoreState;
use std::fmt;

/// 3-bit multiplexer selector (OUT_CTRL)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutCtrl(u8);

impl OutCtrl {
    /// Selector showing the execution engine's IP and fetched opcode
    pub const FETCH: Self = Self(4);

    /// Selector from the low 3 bits of `value`
    pub const fn new(value: u8) -> Self {
        Self(value & 0x7)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn source(self) -> DebugSource {
        DEBUG_TABLE[self.0 as usize]
    }
}

impl fmt::Display for OutCtrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.source())
    }
}

/// Signal pair behind a selector value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DebugSource {
    SpiCodeWrite,
    SpiCodeRead,
    SpiDataWrite,
    SpiDataRead,
    CpuFetch,
    CpuDataWrite,
    CpuDataRead,
}

impl fmt::Display for DebugSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebugSource::SpiCodeWrite => "spi code addr/din",
            DebugSource::SpiCodeRead => "spi code addr/dout",
            DebugSource::SpiDataWrite => "spi data addr/din",
            DebugSource::SpiDataRead => "spi data addr/dout",
            DebugSource::CpuFetch => "ip/opcode",
            DebugSource::CpuDataWrite => "dp/din",
            DebugSource::CpuDataRead => "dp/dout",
        };
        f.write_str(name)
    }
}

/// Selector value is the index
pub const DEBUG_TABLE: [DebugSource; 8] = [
    DebugSource::SpiCodeWrite,
    DebugSource::SpiCodeRead,
    DebugSource::SpiDataWrite,
    DebugSource::SpiDataRead,
    DebugSource::CpuFetch,
    DebugSource::CpuFetch,
    DebugSource::CpuDataWrite,
    DebugSource::CpuDataRead,
];

/// Values on the two debug fields
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugOutput {
    pub wide: u8,
    /// Only the low 3 bits are ever set
    pub narrow: u8,
}

/// Project the selected signal pair out of `state`
pub fn project(state: &CoreState, sel: OutCtrl) -> DebugOutput {
    let memory = state.memory();
    let engine = state.engine();
    let spi = state.spi();

    let (wide, narrow) = match sel.source() {
        DebugSource::SpiCodeWrite => {
            let port = spi.code_port();
            (port.address.low_byte(), port.data.low3())
        }
        DebugSource::SpiCodeRead => {
            let port = spi.code_port();
            (port.address.low_byte(), memory.read(port.address).low3())
        }
        DebugSource::SpiDataWrite => {
            let port = spi.data_port();
            (port.address.low_byte(), port.data.low3())
        }
        DebugSource::SpiDataRead => {
            let port = spi.data_port();
            (port.address.low_byte(), memory.read(port.address).low3())
        }
        DebugSource::CpuFetch => (
            engine.ip(),
            engine.fetched().map(|op| op.to_bits()).unwrap_or(0),
        ),
        // The engine has no store instruction, its write bus stays at 0
        DebugSource::CpuDataWrite => (engine.dp(), 0),
        DebugSource::CpuDataRead => (engine.dp(), memory.read(engine.data_address()).low3()),
    };

    DebugOutput { wide, narrow }
}
