//! Core state and the per-clock transition

use crate::engine::{ExecutionEngine, Transition};
use crate::event::{CoreEvent, EventKind};
use crate::memory::MemoryBank;
use crate::mux::project;
use crate::pins::{Inputs, Mode, Outputs};
use crate::spi::{SpiInterface, SpiOutcome};
use nibbler_spec::{Config, MemoryImage};

/// Every sequential element of the core
#[derive(Debug, Clone)]
pub struct CoreState {
    memory: MemoryBank,
    spi: SpiInterface,
    engine: ExecutionEngine,
    /// MODE as registered on the last clock
    mode: Mode,
    /// RST_N was low on the last clock
    in_reset: bool,
    /// Clocks since power-up
    cycle: u64,
    config: Config,
    events: Vec<CoreEvent>,
}

impl CoreState {
    /// Power-up state: memory filled with `config.fill`, everything else reset
    pub fn new(config: Config) -> Self {
        Self {
            memory: MemoryBank::new(config.fill),
            spi: SpiInterface::new(),
            engine: ExecutionEngine::new(),
            mode: Mode::Programming,
            in_reset: false,
            cycle: 0,
            config,
            events: Vec::new(),
        }
    }

    /// Advance one clock with the given pin levels
    pub fn tick(&mut self, inputs: &Inputs) {
        self.cycle += 1;

        if !inputs.rst_n {
            // Keep the SPI edge detectors in step with the pins during reset
            self.spi.clock(
                inputs.spi_sck,
                inputs.spi_mosi,
                inputs.spi_cs_n,
                false,
                &mut self.memory,
            );
            if self.in_reset {
                self.hold_reset();
            } else {
                self.reset();
            }
            self.in_reset = true;
            return;
        }
        self.in_reset = false;

        if inputs.mode != self.mode {
            self.change_mode(inputs.mode);
        }

        let programming = self.mode == Mode::Programming;

        let outcome = self.spi.clock(
            inputs.spi_sck,
            inputs.spi_mosi,
            inputs.spi_cs_n,
            programming,
            &mut self.memory,
        );
        if let Some(outcome) = outcome {
            self.on_spi(outcome);
        }

        if let Some(transition) = self.engine.clock(inputs.run, !programming, &self.memory) {
            self.on_engine(transition);
        }
    }

    /// Synchronous global reset
    pub fn reset(&mut self) {
        self.hold_reset();
        tracing::trace!(cycle = self.cycle, policy = %self.config.memory_reset, "reset");
        self.record(EventKind::Reset);
    }

    /// Keep every element in its reset state without logging a new reset
    fn hold_reset(&mut self) {
        self.spi.reset();
        self.engine.reset();
        self.mode = Mode::Programming;
        if self.config.clears_memory() {
            self.memory.fill(self.config.fill);
        }
    }

    fn change_mode(&mut self, mode: Mode) {
        tracing::debug!(cycle = self.cycle, %mode, "mode change");
        self.mode = mode;
        // A frame never spans a mode change
        self.spi.abort();
        if mode == Mode::Programming {
            self.engine.reset();
        }
        self.record(EventKind::ModeChanged(mode));
    }

    fn on_spi(&mut self, outcome: SpiOutcome) {
        let kind = match outcome {
            SpiOutcome::Committed(frame) => {
                tracing::debug!(cycle = self.cycle, %frame, "spi frame committed");
                EventKind::FrameCommitted(frame)
            }
            SpiOutcome::Discarded { bits } => {
                tracing::trace!(cycle = self.cycle, bits, "spi frame discarded");
                EventKind::FrameDiscarded { bits }
            }
            SpiOutcome::Ignored(frame) => {
                tracing::trace!(cycle = self.cycle, %frame, "spi frame ignored in execution mode");
                EventKind::FrameIgnored(frame)
            }
        };
        self.record(kind);
    }

    fn on_engine(&mut self, transition: Transition) {
        let kind = match transition {
            Transition::Fetched { ip, opcode } => {
                tracing::debug!(cycle = self.cycle, ip, %opcode, "step fetched");
                EventKind::StepFetched { ip, opcode }
            }
            Transition::Retired { ip, opcode, next_ip } => {
                tracing::debug!(cycle = self.cycle, ip, %opcode, next_ip, "step retired");
                EventKind::StepRetired { ip, next_ip }
            }
        };
        self.record(kind);
    }

    fn record(&mut self, kind: EventKind) {
        if self.config.record_events {
            self.events.push(CoreEvent {
                cycle: self.cycle,
                kind,
            });
        }
    }

    /// Output pin levels; the debug fields follow `inputs.out_ctrl` directly
    pub fn outputs(&self, inputs: &Inputs) -> Outputs {
        let debug = project(self, inputs.out_ctrl);
        Outputs {
            wide: debug.wide,
            narrow: debug.narrow,
            state: self.engine.state().code(),
            spi_miso: self.spi.miso(),
        }
    }

    /// Take the recorded events
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Load an image straight into memory, bypassing the SPI interface
    pub fn load_image(&mut self, image: &MemoryImage) {
        self.memory.load_image(image);
    }

    pub fn memory(&self) -> &MemoryBank {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryBank {
        &mut self.memory
    }

    pub fn spi(&self) -> &SpiInterface {
        &self.spi
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Pure form of `CoreState::tick`: the state after one clock
pub fn step(state: &CoreState, inputs: &Inputs) -> CoreState {
    let mut next = state.clone();
    next.tick(inputs);
    next
}
