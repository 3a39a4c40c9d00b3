//! Core events, recorded when `Config::record_events` is set

use crate::pins::Mode;
use nibbler_spec::{Opcode, SpiFrame};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    Reset,
    ModeChanged(Mode),
    FrameCommitted(SpiFrame),
    FrameDiscarded { bits: u8 },
    FrameIgnored(SpiFrame),
    StepFetched { ip: u8, opcode: Opcode },
    StepRetired { ip: u8, next_ip: u8 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoreEvent {
    /// Clock on which the event happened
    pub cycle: u64,
    pub kind: EventKind,
}

impl fmt::Display for CoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:8}] ", self.cycle)?;
        match self.kind {
            EventKind::Reset => write!(f, "reset"),
            EventKind::ModeChanged(mode) => write!(f, "mode -> {}", mode),
            EventKind::FrameCommitted(frame) => write!(f, "spi {}", frame),
            EventKind::FrameDiscarded { bits } => write!(f, "spi frame discarded after {} bits", bits),
            EventKind::FrameIgnored(frame) => write!(f, "spi {} ignored (execution mode)", frame),
            EventKind::StepFetched { ip, opcode } => write!(f, "fetch ip={:#04x} {}", ip, opcode),
            EventKind::StepRetired { ip, next_ip } => write!(f, "retire ip={:#04x} -> {:#04x}", ip, next_ip),
        }
    }
}
