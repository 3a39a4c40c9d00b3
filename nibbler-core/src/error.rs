//! Core error types
//!
//! The core itself never fails: every pin sequence has a defined outcome.
//! These errors come from the driver side, when an expected handshake does
//! not happen or read-back data disagrees.

use nibbler_spec::{Address, Nibble, NibblerError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Definition error: {0}")]
    Definition(#[from] NibblerError),

    #[error("Timed out after {clocks} clocks waiting for {waiting_for}")]
    Timeout { waiting_for: &'static str, clocks: u64 },

    #[error("Read-back answered for {found} while reading {expected}")]
    ReadbackAddress { expected: Address, found: Address },

    #[error("Verify failed at {address}: expected {expected:#x}, found {found:#x}")]
    VerifyMismatch {
        address: Address,
        expected: Nibble,
        found: Nibble,
    },

    #[error("Step limit exceeded: {limit} steps without STOP")]
    StepLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
