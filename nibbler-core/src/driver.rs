//! Pin-level driver
//!
//! Plays the part of the external controller: generates the clock,
//! sequences reset, bit-bangs SPI frames with the two-phase discipline and
//! runs the RUN/STATE handshake. Everything goes through `Inputs` and
//! `Outputs`; the driver never reaches into the core's state.

use crate::engine::EngineState;
use crate::error::{CoreError, Result};
use crate::mux::OutCtrl;
use crate::pins::{Inputs, Mode, Outputs};
use crate::state::CoreState;
use nibbler_spec::frame::FRAME_BITS;
use nibbler_spec::{Address, Config, MemoryImage, Nibble, Opcode, SpiFrame};

/// What one RUN pulse showed on the debug fields
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepObservation {
    /// IP while RUNNING
    pub ip: u8,
    /// Opcode while RUNNING
    pub opcode: Opcode,
    /// IP after returning to IDLE
    pub next_ip: u8,
}

pub struct Driver {
    core: CoreState,
    inputs: Inputs,
}

impl Driver {
    /// Clocks per SCK half period
    pub const HALF_PERIOD: u32 = 4;

    /// Clocks to let the core settle after reset or a mode change
    pub const SETTLE: u32 = 16;

    /// Clocks to wait for a state change before giving up
    pub const POLL_LIMIT: u64 = 1_000;

    pub fn new(config: Config) -> Self {
        Self::with_core(CoreState::new(config))
    }

    pub fn with_core(core: CoreState) -> Self {
        Self {
            core,
            inputs: Inputs::default(),
        }
    }

    pub fn core(&self) -> &CoreState {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut CoreState {
        &mut self.core
    }

    pub fn into_core(self) -> CoreState {
        self.core
    }

    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    pub fn outputs(&self) -> Outputs {
        self.core.outputs(&self.inputs)
    }

    /// Run `n` clocks with the current inputs
    pub fn clock(&mut self, n: u32) {
        for _ in 0..n {
            self.core.tick(&self.inputs);
        }
    }

    /// Hold reset for two clocks, release it with the bus idle
    pub fn reset(&mut self) {
        self.inputs = Inputs {
            rst_n: false,
            ..Inputs::default()
        };
        self.clock(2);
        self.inputs.rst_n = true;
        self.clock(Self::SETTLE);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.inputs.mode = mode;
        self.inputs.run = false;
        self.clock(Self::SETTLE);
    }

    pub fn enter_programming(&mut self) {
        self.set_mode(Mode::Programming);
    }

    pub fn enter_execution(&mut self) {
        self.set_mode(Mode::Execution);
    }

    pub fn select(&mut self, sel: OutCtrl) {
        self.inputs.out_ctrl = sel;
    }

    /// Shift out the top `bits` bits of `frame`, MSB first, then release chip
    /// select. Returns the bits sampled from MISO, right aligned.
    pub fn transfer_bits(&mut self, frame: SpiFrame, bits: u8) -> u16 {
        let word = frame.encode();
        let bits = bits.min(FRAME_BITS);
        let mut received = 0u16;

        self.inputs.spi_cs_n = false;
        for i in (FRAME_BITS - bits..FRAME_BITS).rev() {
            self.inputs.spi_mosi = (word >> i) & 1 == 1;
            self.clock(1);

            self.inputs.spi_sck = false;
            self.clock(Self::HALF_PERIOD);
            received = (received << 1) | self.outputs().spi_miso as u16;

            self.inputs.spi_sck = true;
            self.clock(Self::HALF_PERIOD);
        }

        // Trailing falling edge before release
        self.inputs.spi_sck = false;
        self.clock(Self::HALF_PERIOD);

        self.inputs.spi_cs_n = true;
        self.inputs.spi_mosi = true;
        self.inputs.spi_sck = true;
        self.clock(Self::HALF_PERIOD);
        received
    }

    /// Full 16-bit frame
    pub fn transfer(&mut self, frame: SpiFrame) -> u16 {
        self.transfer_bits(frame, FRAME_BITS)
    }

    /// Write one cell. Only takes effect in programming mode.
    pub fn write(&mut self, addr: Address, value: Nibble) {
        self.transfer(SpiFrame::write(addr, value));
    }

    /// Read one cell: a request frame, then a second frame to clock out the answer
    pub fn read(&mut self, addr: Address) -> Result<Nibble> {
        let request = SpiFrame::read(addr);
        self.transfer(request);
        let response = SpiFrame::decode(self.transfer(request));
        if response.address != addr {
            return Err(CoreError::ReadbackAddress {
                expected: addr,
                found: response.address,
            });
        }
        Ok(response.data)
    }

    /// Start a write frame and abandon it after `bits` bits
    pub fn abort_frame(&mut self, addr: Address, value: Nibble, bits: u8) {
        self.transfer_bits(SpiFrame::write(addr, value), bits);
    }

    /// Write every cell the image defines
    pub fn load(&mut self, image: &MemoryImage) {
        for (addr, cell) in image.cells() {
            self.write(addr, cell);
        }
    }

    /// Read back every cell the image defines and compare
    pub fn verify(&mut self, image: &MemoryImage) -> Result<()> {
        for (addr, expected) in image.cells() {
            let found = self.read(addr)?;
            if found != expected {
                return Err(CoreError::VerifyMismatch {
                    address: addr,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }

    fn wait_for(&mut self, state: EngineState, waiting_for: &'static str) -> Result<()> {
        let mut clocks = 0;
        while self.outputs().state != state.code() {
            if clocks >= Self::POLL_LIMIT {
                return Err(CoreError::Timeout { waiting_for, clocks });
            }
            self.clock(1);
            clocks += 1;
        }
        Ok(())
    }

    /// One RUN pulse: assert, wait for RUNNING, observe, release, wait for IDLE.
    ///
    /// The selector is switched to the fetch pair for the observation and
    /// restored afterwards.
    pub fn step(&mut self) -> Result<StepObservation> {
        let saved = self.inputs.out_ctrl;
        self.inputs.out_ctrl = OutCtrl::FETCH;

        self.inputs.run = true;
        let result = self.wait_for(EngineState::Running, "RUNNING").and_then(|()| {
            let running = self.outputs();
            self.inputs.run = false;
            self.wait_for(EngineState::Idle, "IDLE")?;
            Ok(StepObservation {
                ip: running.wide,
                opcode: Opcode::from_bits(running.narrow),
                next_ip: self.outputs().wide,
            })
        });

        self.inputs.run = false;
        self.inputs.out_ctrl = saved;
        result
    }

    /// Step until a STOP has been executed, at most `max_steps` pulses
    pub fn run_until_stop(&mut self, max_steps: usize) -> Result<Vec<StepObservation>> {
        let mut steps = Vec::new();
        while steps.len() < max_steps {
            let step = self.step()?;
            steps.push(step);
            if step.opcode.is_stop() {
                return Ok(steps);
            }
        }
        Err(CoreError::StepLimitExceeded { limit: max_steps })
    }
}
