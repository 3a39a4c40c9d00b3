//! Edge detection for externally driven signals
//!
//! The SPI pins are asynchronous to the core clock. Each clock the current
//! level is compared with the level seen on the previous clock; a change is
//! an edge.

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SignalLevel {
    High,
    Low,
}

impl From<bool> for SignalLevel {
    fn from(level: bool) -> Self {
        if level {
            SignalLevel::High
        } else {
            SignalLevel::Low
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Edge {
    Rising,
    Falling,
}

#[derive(Clone, Debug)]
pub struct EdgeDetector {
    previous_level: SignalLevel,
}

impl EdgeDetector {
    pub fn new(initial_level: SignalLevel) -> Self {
        Self {
            previous_level: initial_level,
        }
    }

    pub fn level(&self) -> SignalLevel {
        self.previous_level
    }

    pub fn set_level_then_detect(&mut self, level: SignalLevel) -> Option<Edge> {
        let edge = match (self.previous_level, level) {
            (SignalLevel::Low, SignalLevel::High) => Some(Edge::Rising),
            (SignalLevel::High, SignalLevel::Low) => Some(Edge::Falling),
            _ => None,
        };
        self.previous_level = level;
        edge
    }
}
