//! Execution engine
//!
//! A two-state machine driven by the RUN input:
//!
//! ```text
//!            RUN=1: fetch cell at IP, latch opcode
//!   IDLE  ----------------------------------------->  RUNNING
//!        <-----------------------------------------
//!            RUN=0: retire opcode, IP += 1
//! ```
//!
//! One RUN pulse is one step. STOP does not block the engine; it tells the
//! controller not to pulse RUN again.

use crate::memory::MemoryBank;
use nibbler_spec::{Address, Opcode};
use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    #[default]
    Idle,
    Running,
}

impl EngineState {
    /// Encoding on the 4-bit state output
    pub const fn code(self) -> u8 {
        match self {
            EngineState::Idle => 0b0000,
            EngineState::Running => 0b0001,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => f.write_str("IDLE"),
            EngineState::Running => f.write_str("RUNNING"),
        }
    }
}

/// Engine state transition reported by `clock`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// IDLE -> RUNNING
    Fetched { ip: u8, opcode: Opcode },
    /// RUNNING -> IDLE
    Retired { ip: u8, opcode: Opcode, next_ip: u8 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionEngine {
    state: EngineState,
    /// Instruction pointer into the code window
    ip: u8,
    /// Data pointer into the data window
    dp: u8,
    /// Opcode latched on fetch, cleared on retire
    fetched: Option<Opcode>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to IDLE with both pointers at 0
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one clock.
    ///
    /// Outside execution mode the engine is held in IDLE and RUN is ignored;
    /// a step that was in progress is dropped without moving IP.
    pub fn clock(&mut self, run: bool, enabled: bool, memory: &MemoryBank) -> Option<Transition> {
        if !enabled {
            self.state = EngineState::Idle;
            self.fetched = None;
            return None;
        }

        match (self.state, run) {
            (EngineState::Idle, true) => {
                let opcode = Opcode::from_cell(memory.read(self.code_address()));
                self.fetched = Some(opcode);
                self.state = EngineState::Running;
                Some(Transition::Fetched { ip: self.ip, opcode })
            }
            (EngineState::Running, false) => {
                let ip = self.ip;
                let opcode = self.fetched.take().unwrap_or(Opcode::Nop);
                self.retire(opcode);
                self.state = EngineState::Idle;
                Some(Transition::Retired {
                    ip,
                    opcode,
                    next_ip: self.ip,
                })
            }
            _ => None,
        }
    }

    /// Apply the effect of `opcode`. Every opcode of the minimal set,
    /// reserved ones included, only advances IP; new instructions hook in here.
    fn retire(&mut self, opcode: Opcode) {
        match opcode {
            Opcode::Nop | Opcode::Stop | Opcode::Reserved(_) => {
                self.ip = self.ip.wrapping_add(1);
            }
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn ip(&self) -> u8 {
        self.ip
    }

    pub fn dp(&self) -> u8 {
        self.dp
    }

    pub fn fetched(&self) -> Option<Opcode> {
        self.fetched
    }

    /// Address the code read port is looking at
    pub fn code_address(&self) -> Address {
        Address::code(self.ip)
    }

    /// Address the data read port is looking at
    pub fn data_address(&self) -> Address {
        Address::data(self.dp)
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }
}
