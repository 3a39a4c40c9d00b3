//! SPI programming interface
//!
//! Turns the bit-serial bus into memory accesses, one 16-bit frame at a time.
//!
//! ## Bit clocking
//!
//! ```text
//! CS_N  ‾‾\____________________________ ... ______/‾‾
//! SCK   ‾‾‾‾‾‾\___/‾‾‾\___/‾‾‾ ... \___/‾‾‾\___/‾‾‾‾‾
//! MOSI     <b15 ><b14 >            <b0  >
//!              ^   |   ^   |           ^   |
//!         sample   shift               sample shift
//! ```
//!
//! MOSI is sampled on the SCK falling edge and shifted in on the following
//! rising edge. The frame commits when chip select is released after
//! exactly 16 rising edges; any other count discards it. A trailing falling
//! edge after the 16th bit is harmless. SCK edges on the same clock as a
//! chip-select edge still count: a falling SCK with the assertion samples
//! bit 15, and a rising SCK with the release shifts in bit 0.
//!
//! A read frame answers in the next frame: its response word is loaded when
//! chip select is next asserted and shifted out on MISO, MSB first.

use crate::edge::{Edge, EdgeDetector, SignalLevel};
use crate::memory::MemoryBank;
use nibbler_spec::frame::FRAME_BITS;
use nibbler_spec::{Address, Direction, Nibble, Region, SpiFrame};

/// Last frame address/data seen by one memory region
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PortLatch {
    pub address: Address,
    pub data: Nibble,
}

impl PortLatch {
    fn new(region: Region) -> Self {
        Self {
            address: Address::truncate(region.base()),
            data: Nibble::ZERO,
        }
    }
}

/// What a chip-select release did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpiOutcome {
    /// Full frame accepted and applied to memory
    Committed(SpiFrame),
    /// Wrong bit count, nothing applied
    Discarded { bits: u8 },
    /// Full frame outside programming mode, nothing applied
    Ignored(SpiFrame),
}

#[derive(Clone, Debug)]
pub struct SpiInterface {
    sck: EdgeDetector,
    cs_n: EdgeDetector,

    /// Chip select asserted and frame being assembled
    in_frame: bool,
    /// MOSI as seen on the last falling edge
    sampled: bool,
    shift_in: u16,
    /// Rising edges seen in this frame, saturating one past a full frame
    bit_count: u8,

    shift_out: u16,
    pending_response: Option<u16>,

    code_port: PortLatch,
    data_port: PortLatch,
}

impl SpiInterface {
    pub fn new() -> Self {
        Self {
            sck: EdgeDetector::new(SignalLevel::High),
            cs_n: EdgeDetector::new(SignalLevel::High),
            in_frame: false,
            sampled: false,
            shift_in: 0,
            bit_count: 0,
            shift_out: 0,
            pending_response: None,
            code_port: PortLatch::new(Region::Code),
            data_port: PortLatch::new(Region::Data),
        }
    }

    /// Return to the power-up state, keeping track of the current pin levels
    pub fn reset(&mut self) {
        let sck = self.sck.clone();
        let cs_n = self.cs_n.clone();
        *self = Self::new();
        self.sck = sck;
        self.cs_n = cs_n;
    }

    /// Drop any frame in flight without committing it
    pub fn abort(&mut self) {
        self.in_frame = false;
        self.bit_count = 0;
        self.shift_in = 0;
        self.shift_out = 0;
    }

    /// Advance one clock.
    ///
    /// `enabled` is true in programming mode. Frames are still tracked when
    /// disabled so a release can be reported, but they never touch memory,
    /// the port latches or the pending response.
    pub fn clock(
        &mut self,
        sck: bool,
        mosi: bool,
        cs_n: bool,
        enabled: bool,
        memory: &mut MemoryBank,
    ) -> Option<SpiOutcome> {
        let sck_edge = self.sck.set_level_then_detect(SignalLevel::from(sck));
        let cs_edge = self.cs_n.set_level_then_detect(SignalLevel::from(cs_n));

        match cs_edge {
            Some(Edge::Falling) => self.begin_frame(enabled),
            Some(Edge::Rising) => {
                // The last rising edge may coincide with the release
                if self.in_frame && sck_edge == Some(Edge::Rising) {
                    self.shift();
                }
                return self.end_frame(enabled, memory);
            }
            None => {}
        }

        if !self.in_frame {
            return None;
        }

        match sck_edge {
            Some(Edge::Falling) => self.sampled = mosi,
            Some(Edge::Rising) => self.shift(),
            None => {}
        }
        None
    }

    fn begin_frame(&mut self, enabled: bool) {
        self.in_frame = true;
        self.sampled = false;
        self.shift_in = 0;
        self.bit_count = 0;
        self.shift_out = if enabled {
            self.pending_response.take().unwrap_or(0)
        } else {
            0
        };
    }

    fn shift(&mut self) {
        if self.bit_count < FRAME_BITS {
            self.shift_in = (self.shift_in << 1) | self.sampled as u16;
            self.shift_out <<= 1;
            self.bit_count += 1;
        } else {
            // Overrun: the count stays past 16 and the frame can no longer commit
            self.bit_count = FRAME_BITS + 1;
        }
    }

    fn end_frame(&mut self, enabled: bool, memory: &mut MemoryBank) -> Option<SpiOutcome> {
        if !self.in_frame {
            return None;
        }
        let bits = self.bit_count;
        let word = self.shift_in;
        self.abort();

        if bits != FRAME_BITS {
            return Some(SpiOutcome::Discarded { bits });
        }

        let frame = SpiFrame::decode(word);
        if !enabled {
            return Some(SpiOutcome::Ignored(frame));
        }

        self.commit(frame, memory);
        Some(SpiOutcome::Committed(frame))
    }

    fn commit(&mut self, frame: SpiFrame, memory: &mut MemoryBank) {
        match frame.direction {
            Direction::Write => memory.write(frame.address, frame.data),
            Direction::Read => {
                let value = memory.read(frame.address);
                let response = SpiFrame {
                    data: value,
                    ..frame
                };
                self.pending_response = Some(response.encode());
            }
        }

        let latch = PortLatch {
            address: frame.address,
            data: frame.data,
        };
        match frame.address.region() {
            Region::Code => self.code_port = latch,
            Region::Data => self.data_port = latch,
        }
    }

    /// Current MISO level
    pub fn miso(&self) -> bool {
        self.in_frame && (self.shift_out >> (FRAME_BITS - 1)) & 1 == 1
    }

    pub fn code_port(&self) -> PortLatch {
        self.code_port
    }

    pub fn data_port(&self) -> PortLatch {
        self.data_port
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    pub fn has_pending_response(&self) -> bool {
        self.pending_response.is_some()
    }
}

impl Default for SpiInterface {
    fn default() -> Self {
        Self::new()
    }
}
